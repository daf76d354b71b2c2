use std::collections::HashMap;

use super::OneNoteGateway;
use crate::error::GatewayResult;
use crate::models::{Notebook, Page, Section};

/// In-memory gateway serving fixed records, for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryGateway {
    pub notebooks: Vec<Notebook>,
    pub sections: Vec<Section>,
    pub pages: Vec<Page>,
    pub page_content: HashMap<String, String>,
}

impl MemoryGateway {
    /// One notebook, one section and one page with HTML content.
    pub fn fixture() -> Self {
        let notebooks = vec![Notebook {
            id: "nb-1".into(),
            display_name: "Test Notebook".into(),
            self_url: "https://graph.microsoft.com/v1.0/me/onenote/notebooks/nb-1".into(),
            sections_url: "https://graph.microsoft.com/v1.0/me/onenote/notebooks/nb-1/sections".into(),
            created_date_time: Some("2024-01-01T00:00:00Z".into()),
            last_modified_date_time: Some("2024-01-02T00:00:00Z".into()),
        }];
        let sections = vec![Section {
            id: "sec-1".into(),
            display_name: "Test Section".into(),
            self_url: "https://graph.microsoft.com/v1.0/me/onenote/sections/sec-1".into(),
            pages_url: "https://graph.microsoft.com/v1.0/me/onenote/sections/sec-1/pages".into(),
            created_date_time: Some("2024-01-01T00:00:00Z".into()),
            last_modified_date_time: Some("2024-01-02T00:00:00Z".into()),
            notebook_id: Some("nb-1".into()),
        }];
        let pages = vec![Page {
            id: "page-1".into(),
            title: "My First Note".into(),
            content_url: "https://graph.microsoft.com/v1.0/me/onenote/pages/page-1/content".into(),
            self_url: "https://graph.microsoft.com/v1.0/me/onenote/pages/page-1".into(),
            created_date_time: Some("2024-01-01T00:00:00Z".into()),
            last_modified_date_time: Some("2024-01-02T00:00:00Z".into()),
            section_id: Some("sec-1".into()),
            notebook_id: Some("nb-1".into()),
        }];
        let page_content = HashMap::from([(
            "page-1".to_string(),
            "<html><body><p>Hello from the note.</p></body></html>".to_string(),
        )]);

        Self {
            notebooks,
            sections,
            pages,
            page_content,
        }
    }
}

#[async_trait::async_trait]
impl OneNoteGateway for MemoryGateway {
    async fn list_notebooks(&self, _user_id: Option<&str>) -> GatewayResult<Vec<Notebook>> {
        Ok(self.notebooks.clone())
    }

    async fn list_sections(
        &self,
        notebook_id: &str,
        _user_id: Option<&str>,
    ) -> GatewayResult<Vec<Section>> {
        Ok(self
            .sections
            .iter()
            .filter(|s| s.notebook_id.as_deref() == Some(notebook_id))
            .cloned()
            .collect())
    }

    async fn list_pages(
        &self,
        section_id: Option<&str>,
        notebook_id: Option<&str>,
        _user_id: Option<&str>,
    ) -> GatewayResult<Vec<Page>> {
        // Same stamping as the Graph gateway: parents only when a section was asked for
        let (section_id, notebook_id) = match section_id {
            Some(section_id) => (Some(section_id), notebook_id),
            None => (None, None),
        };
        Ok(self
            .pages
            .iter()
            .filter(|p| section_id.is_none() || p.section_id.as_deref() == section_id)
            .map(|p| Page {
                section_id: section_id.map(str::to_string),
                notebook_id: notebook_id.map(str::to_string),
                ..p.clone()
            })
            .collect())
    }

    async fn get_page_content(&self, page_id: &str, _user_id: Option<&str>) -> GatewayResult<String> {
        Ok(self.page_content.get(page_id).cloned().unwrap_or_default())
    }
}
