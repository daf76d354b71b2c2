use reqwest::Url;
use serde_json::Value;

use super::OneNoteGateway;
use crate::auth::Credential;
use crate::config::GraphConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{Notebook, Page, Section};
use crate::record::RawRecord;

/// OneNote gateway backed by the Microsoft Graph REST API.
pub struct GraphGateway {
    client: reqwest::Client,
    credential: Credential,
    base_url: Url,
    default_user: Option<String>,
}

impl GraphGateway {
    pub fn new(config: &GraphConfig) -> GatewayResult<Self> {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &GraphConfig, client: reqwest::Client) -> GatewayResult<Self> {
        let credential = Credential::from_config(config)?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(config.base_url.clone()));
        }

        log::info!(
            "Graph gateway ready ({} auth, base {})",
            credential.mode(),
            base_url
        );

        Ok(Self {
            client,
            credential,
            base_url,
            default_user: config.user_id.clone(),
        })
    }

    fn resolve_user<'a>(&'a self, user_id: Option<&'a str>) -> Option<&'a str> {
        user_id
            .filter(|u| !u.trim().is_empty())
            .or(self.default_user.as_deref())
    }

    /// `{base}/me/onenote/{path..}` or `{base}/users/{id}/onenote/{path..}`.
    fn onenote_url(&self, user_id: Option<&str>, path: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            match self.resolve_user(user_id) {
                Some(user) => {
                    segments.push("users").push(user);
                }
                None => {
                    segments.push("me");
                }
            }
            segments.push("onenote").extend(path);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> GatewayResult<reqwest::Response> {
        let token = self.credential.bearer_token(&self.client).await?;
        log::debug!("GET {}", url);

        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(response)
    }

    async fn get_records(&self, url: Url) -> GatewayResult<Vec<RawRecord>> {
        let body: Value = self.get(url).await?.json().await?;
        Ok(extract_records(body))
    }
}

/// Pull item mappings out of a list response (`{"value": [...]}` or a bare array).
pub(crate) fn extract_records(body: Value) -> Vec<RawRecord> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            other => {
                log::warn!("Skipping non-object item in Graph response: {}", other);
                None
            }
        })
        .collect()
}

/// Human-readable message from a Graph error body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait::async_trait]
impl OneNoteGateway for GraphGateway {
    async fn list_notebooks(&self, user_id: Option<&str>) -> GatewayResult<Vec<Notebook>> {
        let url = self.onenote_url(user_id, &["notebooks"])?;
        self.get_records(url)
            .await?
            .iter()
            .map(Notebook::from_graph)
            .collect()
    }

    async fn list_sections(
        &self,
        notebook_id: &str,
        user_id: Option<&str>,
    ) -> GatewayResult<Vec<Section>> {
        let url = self.onenote_url(user_id, &["notebooks", notebook_id, "sections"])?;
        self.get_records(url)
            .await?
            .iter()
            .map(|raw| Section::from_graph(raw, Some(notebook_id)))
            .collect()
    }

    async fn list_pages(
        &self,
        section_id: Option<&str>,
        notebook_id: Option<&str>,
        user_id: Option<&str>,
    ) -> GatewayResult<Vec<Page>> {
        match section_id {
            Some(section_id) => {
                let url = self.onenote_url(user_id, &["sections", section_id, "pages"])?;
                self.get_records(url)
                    .await?
                    .iter()
                    .map(|raw| Page::from_graph(raw, Some(section_id), notebook_id))
                    .collect()
            }
            None => {
                let url = self.onenote_url(user_id, &["pages"])?;
                self.get_records(url)
                    .await?
                    .iter()
                    .map(|raw| Page::from_graph(raw, None, None))
                    .collect()
            }
        }
    }

    async fn get_page_content(&self, page_id: &str, user_id: Option<&str>) -> GatewayResult<String> {
        let url = self.onenote_url(user_id, &["pages", page_id, "content"])?;
        let bytes = self.get(url).await?.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
