pub mod content;
pub mod notebooks;
pub mod pages;
pub mod sections;

pub use content::{ReadNoteContent, ReadNoteContentInput};
pub use notebooks::{ListNotes, ListNotesInput};
pub use pages::{ListNotePages, ListNotePagesInput};
pub use sections::{ListNoteSections, ListNoteSectionsInput};

use anyhow::Result;

/// Tool trait for operations exposed over MCP.
///
/// Not object-safe (associated types) — intentional.
/// The server holds each tool by concrete type and routes to it from its
/// `#[tool]` methods, which also carry the advertised description and schema.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    type Input: Send;

    fn name(&self) -> &str;
    async fn run(&self, input: Self::Input) -> Result<String>;
}

/// Markdown bullet used by every listing tool.
pub(crate) fn bullet(label: &str, id: &str) -> String {
    format!("- **{}** (id: `{}`)", label, id)
}

/// Clients often send `""` for an omitted optional argument.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
