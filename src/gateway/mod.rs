pub mod graph;
#[cfg(test)]
pub mod memory;

pub use graph::GraphGateway;
#[cfg(test)]
pub use memory::MemoryGateway;

use crate::error::GatewayResult;
use crate::models::{Notebook, Page, Section};

/// Read-only access to OneNote notebooks, sections and pages.
///
/// `user_id` selects whose notes are read: `None` acts as the signed-in
/// caller, `Some` acts as the named user (application permissions).
/// Results keep the order of the backing source.
#[async_trait::async_trait]
pub trait OneNoteGateway: Send + Sync {
    async fn list_notebooks(&self, user_id: Option<&str>) -> GatewayResult<Vec<Notebook>>;

    async fn list_sections(
        &self,
        notebook_id: &str,
        user_id: Option<&str>,
    ) -> GatewayResult<Vec<Section>>;

    /// Pages of `section_id`, or every page visible to the caller when absent.
    /// `notebook_id` is only stamped onto the returned pages.
    async fn list_pages(
        &self,
        section_id: Option<&str>,
        notebook_id: Option<&str>,
        user_id: Option<&str>,
    ) -> GatewayResult<Vec<Page>>;

    /// HTML body of a page, or an empty string when the page has none.
    async fn get_page_content(&self, page_id: &str, user_id: Option<&str>) -> GatewayResult<String>;
}
