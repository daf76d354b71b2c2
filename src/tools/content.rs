use anyhow::Result;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

use super::{non_blank, Tool};
use crate::gateway::OneNoteGateway;
use crate::use_cases;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadNoteContentInput {
    /// Page id from list_note_pages.
    pub page_id: String,
    /// User id or UPN, for app-only access.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Returns the HTML body of a page.
#[derive(Clone)]
pub struct ReadNoteContent {
    gateway: Arc<dyn OneNoteGateway>,
}

impl ReadNoteContent {
    pub fn new(gateway: Arc<dyn OneNoteGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl Tool for ReadNoteContent {
    type Input = ReadNoteContentInput;

    fn name(&self) -> &str {
        "read_note_content"
    }

    async fn run(&self, input: ReadNoteContentInput) -> Result<String> {
        let user_id = non_blank(input.user_id);
        log::info!("ReadNoteContent: page {} (user={:?})", input.page_id, user_id);

        let content =
            use_cases::get_note_content(self.gateway.as_ref(), &input.page_id, user_id.as_deref())
                .await?;

        if content.is_empty() {
            return Ok("(empty page)".to_string());
        }
        log::info!("ReadNoteContent: {} chars", content.len());
        Ok(content)
    }
}
