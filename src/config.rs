use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub logging: LoggingConfig,
}

/// How MCP clients reach the server.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// One client over stdin/stdout.
    Stdio,
    /// Streamable HTTP on `host:port`.
    #[default]
    #[serde(alias = "streamable-http")]
    Http,
}

impl Transport {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "stdio" => Some(Transport::Stdio),
            "http" | "streamable-http" => Some(Transport::Http),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GraphConfig {
    pub base_url: String,
    pub authority: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
    /// Default user for app-only access when a call names none.
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant_id: None,
            client_id: None,
            client_secret: None,
            access_token: None,
            user_id: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load the optional config file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override settings from variables resolved by `var`; blank values count as unset.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let graph = &mut self.graph;

        for (name, slot) in [
            ("AZURE_TENANT_ID", &mut graph.tenant_id),
            ("AZURE_CLIENT_ID", &mut graph.client_id),
            ("AZURE_CLIENT_SECRET", &mut graph.client_secret),
            ("ONENOTE_ACCESS_TOKEN", &mut graph.access_token),
            ("ONENOTE_USER_ID", &mut graph.user_id),
        ] {
            if let Some(value) = non_empty(var(name)) {
                *slot = Some(value);
            } else {
                *slot = non_empty(slot.take());
            }
        }

        if let Some(base_url) = non_empty(var("GRAPH_BASE_URL")) {
            graph.base_url = base_url;
        }
        if let Some(authority) = non_empty(var("AZURE_AUTHORITY")) {
            graph.authority = authority;
        }

        let server = &mut self.server;
        if let Some(transport) = non_empty(var("MCP_TRANSPORT")) {
            match Transport::parse(&transport) {
                Some(t) => server.transport = t,
                None => log::warn!("Ignoring unknown MCP_TRANSPORT {:?}", transport),
            }
        }
        if let Some(host) = non_empty(var("MCP_HOST")) {
            server.host = host;
        }
        // PORT is the platform-assigned port on most hosting services
        if let Some(port) = non_empty(var("MCP_PORT")).or_else(|| non_empty(var("PORT"))) {
            match port.parse() {
                Ok(p) => server.port = p,
                Err(_) => log::warn!("Ignoring invalid port {:?}", port),
            }
        }
    }
}
