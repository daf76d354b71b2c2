//! MCP server exposing the OneNote tools over stdio or streamable HTTP.

use anyhow::{Context, Result};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::serve_server,
    tool, tool_handler, tool_router,
    transport::{
        async_rw::AsyncRwTransport,
        io::stdio,
        streamable_http_server::{session::local::LocalSessionManager, StreamableHttpService},
    },
    ErrorData, ServerHandler,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::gateway::OneNoteGateway;
use crate::tools::{
    ListNotePages, ListNotePagesInput, ListNoteSections, ListNoteSectionsInput, ListNotes,
    ListNotesInput, ReadNoteContent, ReadNoteContentInput, Tool,
};

pub const SERVER_NAME: &str = "OneNote";
/// Path the streamable HTTP endpoint is mounted on.
pub const MCP_PATH: &str = "/mcp";

#[derive(Clone)]
pub struct OneNoteServer {
    notebooks: ListNotes,
    sections: ListNoteSections,
    pages: ListNotePages,
    content: ReadNoteContent,
    tool_router: ToolRouter<OneNoteServer>,
}

/// Run `tool`; failures become error results the model can read.
async fn respond<T: Tool>(tool: &T, input: T::Input) -> Result<CallToolResult, ErrorData> {
    match tool.run(input).await {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => {
            log::error!("Tool {} failed: {:#}", tool.name(), e);
            Ok(CallToolResult::error(vec![Content::text(format!("{:#}", e))]))
        }
    }
}

#[tool_router]
impl OneNoteServer {
    /// All tools share one gateway.
    pub fn new(gateway: Arc<dyn OneNoteGateway>) -> Self {
        Self {
            notebooks: ListNotes::new(gateway.clone()),
            sections: ListNoteSections::new(gateway.clone()),
            pages: ListNotePages::new(gateway.clone()),
            content: ReadNoteContent::new(gateway),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "List all OneNote notebooks for the user (or for the given user_id in app-only auth)."
    )]
    pub async fn list_notes(
        &self,
        Parameters(input): Parameters<ListNotesInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(&self.notebooks, input).await
    }

    #[tool(description = "List all sections in a OneNote notebook. Use notebook_id from list_notes.")]
    pub async fn list_note_sections(
        &self,
        Parameters(input): Parameters<ListNoteSectionsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(&self.sections, input).await
    }

    #[tool(
        description = "List OneNote pages. If section_id is given, list pages in that section; otherwise list all pages for the user."
    )]
    pub async fn list_note_pages(
        &self,
        Parameters(input): Parameters<ListNotePagesInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(&self.pages, input).await
    }

    #[tool(description = "Get the HTML content of a OneNote page. Use page_id from list_note_pages.")]
    pub async fn read_note_content(
        &self,
        Parameters(input): Parameters<ReadNoteContentInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(&self.content, input).await
    }
}

#[tool_handler]
impl ServerHandler for OneNoteServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Read-only access to Microsoft OneNote: list notebooks, sections and pages, \
                 then read a page's HTML content."
                    .to_string(),
            ),
        }
    }
}

impl OneNoteServer {
    /// Serve one client on the process's stdin/stdout until it disconnects.
    pub async fn serve_stdio(self) -> Result<()> {
        let (stdin, stdout) = stdio();
        let transport = AsyncRwTransport::new_server(stdin, stdout);
        let running = serve_server(self, transport)
            .await
            .context("Failed to start MCP stdio session")?;
        running.waiting().await?;
        log::info!("MCP stdio session ended");
        Ok(())
    }

    /// Serve streamable HTTP on `listener` under [`MCP_PATH`] until `shutdown` resolves.
    pub async fn serve_http<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let service = StreamableHttpService::new(
            move || Ok(self.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );
        let router = axum::Router::new().nest_service(MCP_PATH, service);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("MCP HTTP server failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GatewayError, GatewayResult};
    use crate::gateway::MemoryGateway;
    use crate::models::{Notebook, Page, Section};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    /// Gateway whose every call fails the way an unreachable Graph would.
    struct DownGateway;

    fn down() -> GatewayError {
        GatewayError::Api {
            status: 503,
            message: "upstream down".into(),
        }
    }

    #[async_trait]
    impl OneNoteGateway for DownGateway {
        async fn list_notebooks(&self, _user_id: Option<&str>) -> GatewayResult<Vec<Notebook>> {
            Err(down())
        }

        async fn list_sections(
            &self,
            _notebook_id: &str,
            _user_id: Option<&str>,
        ) -> GatewayResult<Vec<Section>> {
            Err(down())
        }

        async fn list_pages(
            &self,
            _section_id: Option<&str>,
            _notebook_id: Option<&str>,
            _user_id: Option<&str>,
        ) -> GatewayResult<Vec<Page>> {
            Err(down())
        }

        async fn get_page_content(&self, _page_id: &str, _user_id: Option<&str>) -> GatewayResult<String> {
            Err(down())
        }
    }

    fn server_with(gateway: MemoryGateway) -> OneNoteServer {
        OneNoteServer::new(Arc::new(gateway))
    }

    fn test_server() -> OneNoteServer {
        server_with(MemoryGateway::fixture())
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text_content) => &text_content.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_server_info() {
        let info = test_server().get_info();
        assert_eq!(info.server_info.name, "OneNote");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_router_lists_all_tools() {
        let tools = test_server().tool_router.list_all();
        let mut names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["list_note_pages", "list_note_sections", "list_notes", "read_note_content"]
        );

        let read = tools.iter().find(|t| t.name == "read_note_content").unwrap();
        let required = read.input_schema.get("required").unwrap();
        assert_eq!(required, &json!(["page_id"]));
    }

    #[tokio::test]
    async fn test_list_notes_scenario() {
        let result = test_server()
            .list_notes(Parameters(ListNotesInput::default()))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "- **Test Notebook** (id: `nb-1`)");
    }

    #[tokio::test]
    async fn test_empty_sections_scenario() {
        let mut gateway = MemoryGateway::fixture();
        gateway.sections.clear();
        let input = ListNoteSectionsInput {
            notebook_id: "nb-1".into(),
            user_id: None,
        };

        let result = server_with(gateway)
            .list_note_sections(Parameters(input))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "No sections found in this notebook.");
    }

    #[tokio::test]
    async fn test_unknown_page_scenario() {
        let input = ReadNoteContentInput {
            page_id: "missing".into(),
            user_id: None,
        };
        let result = test_server().read_note_content(Parameters(input)).await.unwrap();
        assert_eq!(text_of(&result), "(empty page)");
    }

    #[tokio::test]
    async fn test_untitled_page_scenario() {
        let mut gateway = MemoryGateway::fixture();
        gateway.pages[0].title.clear();

        let result = server_with(gateway)
            .list_note_pages(Parameters(ListNotePagesInput::default()))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "- **(untitled)** (id: `page-1`)");
    }

    #[tokio::test]
    async fn test_gateway_failure_is_tool_error() {
        let server = OneNoteServer::new(Arc::new(DownGateway));
        let result = server
            .list_notes(Parameters(ListNotesInput::default()))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("upstream down"));
    }

    #[tokio::test]
    async fn test_http_endpoint_answers_initialize() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(test_server().serve_http(listener, async move {
            stopped.await.ok();
        }));

        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "onenote-mcp-test", "version": "0.0.0"}
            }
        });
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let mut response = client
            .post(format!("http://{}{}", addr, MCP_PATH))
            .header("Accept", "application/json, text/event-stream")
            .json(&request)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let mut received = String::new();
        tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(chunk) = response.chunk().await.unwrap() {
                received.push_str(&String::from_utf8_lossy(&chunk));
                if received.contains("serverInfo") {
                    break;
                }
            }
        })
        .await
        .unwrap();
        assert!(received.contains("\"OneNote\""));

        drop(response);
        drop(client);
        stop.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
