//! Authentication material and how it travels.

use std::fmt;

/// How a namespace authenticates its requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `api_key` and `api_secret` travel as request params.
    Query,
    /// `Authorization: Bearer <token>` header.
    Header,
}

/// Credentials held by a client for its whole lifetime.
///
/// A client may carry a key pair, a bearer token, or both; each namespace
/// picks the material its `AuthMode` needs when a request is built.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: Option<String>,
    api_secret: Option<String>,
    token: Option<String>,
}

impl Credentials {
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            api_secret: Some(api_secret.to_string()),
            token: None,
        }
    }

    pub fn bearer(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The `api_key`/`api_secret` pair for query-param auth.
    pub fn key_pair(&self) -> crate::Result<(&str, &str)> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(crate::Error::MissingCredentials("api_key"))?;
        let secret = self
            .api_secret
            .as_deref()
            .ok_or(crate::Error::MissingCredentials("api_secret"))?;
        Ok((key, secret))
    }

    /// Value of the `Authorization` header for header auth.
    pub fn authorization(&self) -> crate::Result<String> {
        self.token
            .as_deref()
            .map(|token| format!("Bearer {token}"))
            .ok_or(crate::Error::MissingCredentials("token"))
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
