use serde::Deserialize;

use crate::config::GraphConfig;
use crate::error::{GatewayError, GatewayResult};

const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// How the gateway authenticates against Microsoft Graph.
pub enum Credential {
    /// Client credentials flow (app-only, `Notes.Read.All`).
    Application {
        authority: String,
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// Bearer token obtained out of band for a signed-in user.
    Delegated { access_token: String },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenError {
    error: Option<String>,
    error_description: Option<String>,
}

impl Credential {
    /// Pick the auth mode from configuration.
    ///
    /// Tenant, client id and secret together select the application flow;
    /// anything less falls back to delegated, which needs a client id and a
    /// pre-acquired access token.
    pub fn from_config(config: &GraphConfig) -> GatewayResult<Self> {
        if let (Some(tenant_id), Some(client_id), Some(client_secret)) = (
            config.tenant_id.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        ) {
            return Ok(Credential::Application {
                authority: config.authority.trim_end_matches('/').to_string(),
                tenant_id,
                client_id,
                client_secret,
            });
        }

        if config.client_id.is_none() {
            return Err(GatewayError::Config(
                "set AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET for app-only access, \
                 or AZURE_CLIENT_ID with ONENOTE_ACCESS_TOKEN for delegated access \
                 (app registration needs Notes.Read and User.Read)"
                    .to_string(),
            ));
        }

        match config.access_token.clone() {
            Some(access_token) => Ok(Credential::Delegated { access_token }),
            None => Err(GatewayError::Config(
                "delegated access requires ONENOTE_ACCESS_TOKEN (a Graph token with Notes.Read)"
                    .to_string(),
            )),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Credential::Application { .. } => "application",
            Credential::Delegated { .. } => "delegated",
        }
    }

    /// Bearer token for the next Graph request.
    pub async fn bearer_token(&self, client: &reqwest::Client) -> GatewayResult<String> {
        match self {
            Credential::Delegated { access_token } => Ok(access_token.clone()),
            Credential::Application {
                authority,
                tenant_id,
                client_id,
                client_secret,
            } => {
                let url = format!("{}/{}/oauth2/v2.0/token", authority, tenant_id);
                log::debug!("Requesting app-only token from {}", url);

                let response = client
                    .post(&url)
                    .form(&[
                        ("client_id", client_id.as_str()),
                        ("client_secret", client_secret.as_str()),
                        ("scope", GRAPH_DEFAULT_SCOPE),
                        ("grant_type", "client_credentials"),
                    ])
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(GatewayError::Auth {
                        status: status.as_u16(),
                        message: token_error_message(&body),
                    });
                }

                let token: TokenResponse = response.json().await?;
                Ok(token.access_token)
            }
        }
    }
}

fn token_error_message(body: &str) -> String {
    match serde_json::from_str::<TokenError>(body) {
        Ok(TokenError {
            error_description: Some(description),
            ..
        }) => description,
        Ok(TokenError {
            error: Some(error), ..
        }) => error,
        _ => body.to_string(),
    }
}
