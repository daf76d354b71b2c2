use anyhow::Result;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

use super::{bullet, non_blank, Tool};
use crate::gateway::OneNoteGateway;
use crate::models::Notebook;
use crate::use_cases;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListNotesInput {
    /// User id or UPN, for app-only access.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Lists the caller's notebooks.
#[derive(Clone)]
pub struct ListNotes {
    gateway: Arc<dyn OneNoteGateway>,
}

impl ListNotes {
    pub fn new(gateway: Arc<dyn OneNoteGateway>) -> Self {
        Self { gateway }
    }
}

pub fn format_notebooks(notebooks: &[Notebook]) -> String {
    if notebooks.is_empty() {
        return "No notebooks found.".to_string();
    }
    notebooks
        .iter()
        .map(|n| bullet(&n.display_name, &n.id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait::async_trait]
impl Tool for ListNotes {
    type Input = ListNotesInput;

    fn name(&self) -> &str {
        "list_notes"
    }

    async fn run(&self, input: ListNotesInput) -> Result<String> {
        let user_id = non_blank(input.user_id);
        log::info!("ListNotes: listing notebooks (user={:?})", user_id);

        let notebooks = use_cases::list_notebooks(self.gateway.as_ref(), user_id.as_deref()).await?;

        log::info!("ListNotes: found {} notebook(s)", notebooks.len());
        Ok(format_notebooks(&notebooks))
    }
}
