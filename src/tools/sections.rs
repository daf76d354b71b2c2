use anyhow::Result;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

use super::{bullet, non_blank, Tool};
use crate::gateway::OneNoteGateway;
use crate::models::Section;
use crate::use_cases;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListNoteSectionsInput {
    /// Notebook id from list_notes.
    pub notebook_id: String,
    /// User id or UPN, for app-only access.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Lists the sections of one notebook.
#[derive(Clone)]
pub struct ListNoteSections {
    gateway: Arc<dyn OneNoteGateway>,
}

impl ListNoteSections {
    pub fn new(gateway: Arc<dyn OneNoteGateway>) -> Self {
        Self { gateway }
    }
}

pub fn format_sections(sections: &[Section]) -> String {
    if sections.is_empty() {
        return "No sections found in this notebook.".to_string();
    }
    sections
        .iter()
        .map(|s| bullet(&s.display_name, &s.id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait::async_trait]
impl Tool for ListNoteSections {
    type Input = ListNoteSectionsInput;

    fn name(&self) -> &str {
        "list_note_sections"
    }

    async fn run(&self, input: ListNoteSectionsInput) -> Result<String> {
        let user_id = non_blank(input.user_id);
        log::info!("ListNoteSections: notebook {} (user={:?})", input.notebook_id, user_id);

        let sections =
            use_cases::list_sections(self.gateway.as_ref(), &input.notebook_id, user_id.as_deref())
                .await?;

        log::info!("ListNoteSections: found {} section(s)", sections.len());
        Ok(format_sections(&sections))
    }
}
