use anyhow::Result;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

use super::{bullet, non_blank, Tool};
use crate::gateway::OneNoteGateway;
use crate::models::Page;
use crate::use_cases;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListNotePagesInput {
    /// Section id from list_note_sections; omit to list every page.
    #[serde(default)]
    pub section_id: Option<String>,
    /// User id or UPN, for app-only access.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Lists pages of a section, or all pages of the user.
#[derive(Clone)]
pub struct ListNotePages {
    gateway: Arc<dyn OneNoteGateway>,
}

impl ListNotePages {
    pub fn new(gateway: Arc<dyn OneNoteGateway>) -> Self {
        Self { gateway }
    }
}

pub fn format_pages(pages: &[Page]) -> String {
    if pages.is_empty() {
        return "No pages found.".to_string();
    }
    pages
        .iter()
        .map(|p| {
            let title = if p.title.is_empty() { "(untitled)" } else { p.title.as_str() };
            bullet(title, &p.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait::async_trait]
impl Tool for ListNotePages {
    type Input = ListNotePagesInput;

    fn name(&self) -> &str {
        "list_note_pages"
    }

    async fn run(&self, input: ListNotePagesInput) -> Result<String> {
        let section_id = non_blank(input.section_id);
        let user_id = non_blank(input.user_id);
        log::info!("ListNotePages: section {:?} (user={:?})", section_id, user_id);

        let pages = use_cases::list_pages(
            self.gateway.as_ref(),
            section_id.as_deref(),
            None,
            user_id.as_deref(),
        )
        .await?;

        log::info!("ListNotePages: found {} page(s)", pages.len());
        Ok(format_pages(&pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    #[tokio::test]
    async fn test_lists_all_pages() {
        let tool = ListNotePages::new(Arc::new(MemoryGateway::fixture()));
        let text = tool.run(ListNotePagesInput::default()).await.unwrap();
        assert_eq!(text, "- **My First Note** (id: `page-1`)");
    }

    #[tokio::test]
    async fn test_blank_section_lists_all_pages() {
        let tool = ListNotePages::new(Arc::new(MemoryGateway::fixture()));
        let input = ListNotePagesInput {
            section_id: Some(String::new()),
            user_id: None,
        };
        assert!(tool.run(input).await.unwrap().contains("page-1"));
    }

    #[tokio::test]
    async fn test_unknown_section_has_no_pages() {
        let tool = ListNotePages::new(Arc::new(MemoryGateway::fixture()));
        let input = ListNotePagesInput {
            section_id: Some("sec-404".into()),
            user_id: None,
        };
        assert_eq!(tool.run(input).await.unwrap(), "No pages found.");
    }

    #[tokio::test]
    async fn test_untitled_page() {
        let mut gateway = MemoryGateway::fixture();
        gateway.pages[0].title = String::new();
        let tool = ListNotePages::new(Arc::new(gateway));

        let text = tool.run(ListNotePagesInput::default()).await.unwrap();
        assert_eq!(text, "- **(untitled)** (id: `page-1`)");
    }
}
