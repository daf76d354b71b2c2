use crate::error::GatewayResult;
use crate::gateway::OneNoteGateway;
use crate::models::{Notebook, Page, Section};

/// List all notebooks for the caller (or `user_id` under app-only auth).
pub async fn list_notebooks(
    gateway: &dyn OneNoteGateway,
    user_id: Option<&str>,
) -> GatewayResult<Vec<Notebook>> {
    gateway.list_notebooks(user_id).await
}

pub async fn list_sections(
    gateway: &dyn OneNoteGateway,
    notebook_id: &str,
    user_id: Option<&str>,
) -> GatewayResult<Vec<Section>> {
    gateway.list_sections(notebook_id, user_id).await
}

/// List pages in a section, or every page for the user.
pub async fn list_pages(
    gateway: &dyn OneNoteGateway,
    section_id: Option<&str>,
    notebook_id: Option<&str>,
    user_id: Option<&str>,
) -> GatewayResult<Vec<Page>> {
    gateway.list_pages(section_id, notebook_id, user_id).await
}

pub async fn get_note_content(
    gateway: &dyn OneNoteGateway,
    page_id: &str,
    user_id: Option<&str>,
) -> GatewayResult<String> {
    gateway.get_page_content(page_id, user_id).await
}
