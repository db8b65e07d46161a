//! Client and per-namespace configuration.
//!
//! Both structs are immutable once handed to a `Client`; every namespace
//! receives its own `NamespaceConfig` at construction.

use std::time::Duration;

use url::Url;

use crate::credentials::{AuthMode, Credentials};
use crate::error::{Error, Result};

pub const DEFAULT_API_HOST: &str = "api.nexmo.com";
pub const DEFAULT_REST_HOST: &str = "rest.nexmo.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How POST/PUT params are written to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    #[default]
    Form,
    Json,
}

/// Settings shared by every endpoint in a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Scheme and authority, e.g. `https://api.nexmo.com`.
    pub base_url: Url,
    pub auth_mode: AuthMode,
    pub body_encoding: BodyEncoding,
    /// Sent with every request after `User-Agent`.
    pub headers: Vec<(String, String)>,
}

impl NamespaceConfig {
    /// Query-param auth, form bodies, no extra headers.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_mode: AuthMode::Query,
            body_encoding: BodyEncoding::Form,
            headers: Vec::new(),
        }
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn with_body_encoding(mut self, body_encoding: BodyEncoding) -> Self {
        self.body_encoding = body_encoding;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Host name used in logs and error messages.
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }
}

/// Everything a `Client` needs besides its transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub api_host: String,
    pub rest_host: String,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_host: DEFAULT_API_HOST.to_string(),
            rest_host: DEFAULT_REST_HOST.to_string(),
            app_name: None,
            app_version: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `NEXMO_API_KEY`, `NEXMO_API_SECRET`, `NEXMO_TOKEN`,
    /// `NEXMO_API_HOST` and `NEXMO_REST_HOST`. Unset variables keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let credentials = match (lookup("NEXMO_API_KEY"), lookup("NEXMO_API_SECRET")) {
            (Some(key), Some(secret)) => Credentials::new(&key, &secret),
            _ => Credentials::default(),
        };
        let credentials = match lookup("NEXMO_TOKEN") {
            Some(token) => credentials.with_token(&token),
            None => credentials,
        };
        let mut config = Self::new(credentials);
        if let Some(host) = lookup("NEXMO_API_HOST") {
            config.api_host = host;
        }
        if let Some(host) = lookup("NEXMO_REST_HOST") {
            config.rest_host = host;
        }
        config
    }

    /// Override the host of the JSON APIs. Accepts a bare host or a base URL
    /// without a path (`http://127.0.0.1:3000`).
    pub fn with_api_host(mut self, host: &str) -> Self {
        self.api_host = host.to_string();
        self
    }

    pub fn with_rest_host(mut self, host: &str) -> Self {
        self.rest_host = host.to_string();
        self
    }

    /// Identify the calling application in the `User-Agent` header.
    pub fn with_app(mut self, name: &str, version: &str) -> Self {
        self.app_name = Some(name.to_string());
        self.app_version = Some(version.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(&self) -> String {
        let mut agent = format!("nexmo-rust/{}", env!("CARGO_PKG_VERSION"));
        if let (Some(name), Some(version)) = (&self.app_name, &self.app_version) {
            agent.push_str(&format!(" {name}/{version}"));
        }
        agent
    }

    pub fn api_base_url(&self) -> Result<Url> {
        base_url(&self.api_host)
    }

    pub fn rest_base_url(&self) -> Result<Url> {
        base_url(&self.rest_host)
    }
}

/// Bare hosts are served over HTTPS; full URLs are taken as given.
fn base_url(host: &str) -> Result<Url> {
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    let url = Url::parse(&raw).map_err(|e| Error::Config(format!("invalid host `{host}`: {e}")))?;
    if url.host_str().is_none() {
        return Err(Error::Config(format!("invalid host `{host}`: no host name")));
    }
    // Endpoint paths are absolute and would replace any base path.
    if url.path() != "/" || url.query().is_some() {
        return Err(Error::Config(format!(
            "invalid host `{host}`: base URL must not carry a path or query"
        )));
    }
    Ok(url)
}
