//! Error types for the Nexmo API client.
//!
//! # Design
//! Every non-2xx response becomes exactly one `ApiError`, whose `kind` is
//! picked from the status range. `ApiError` sits inside the crate-wide
//! `Error`, next to the failures that never reach classification
//! (transport, encoding, missing credentials) and the one that happens
//! after it (a JSON success body that does not parse). Match on `Error` to
//! catch broadly, on `ApiErrorKind` to catch narrowly.

use std::fmt;

/// The status range an `ApiError` was mapped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401.
    Authentication,
    /// 4xx other than 401.
    Client,
    /// 5xx.
    Server,
    /// Any other non-success status.
    Generic,
}

/// A non-success response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    /// Map a status code returned by `host` to the matching error kind.
    pub fn from_status(status: u16, host: &str) -> Self {
        let kind = match status {
            401 => ApiErrorKind::Authentication,
            400..=499 => ApiErrorKind::Client,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Generic,
        };
        Self {
            kind,
            status: Some(status),
            message: format!("{status} response from {host}"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ApiErrorKind::Authentication => "authentication error",
            ApiErrorKind::Client => "client error",
            ApiErrorKind::Server => "server error",
            ApiErrorKind::Generic => "API error",
        };
        write!(f, "{label}: {}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// The request never produced a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("reading response body from {url} failed: {message}")]
    Body { url: String, message: String },
}

/// Errors returned by the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A success response declared `application/json` but its body is not.
    #[error("failed to parse JSON response: {source} (body: {body})")]
    Parse {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// Params cannot be encoded in the namespace's encoding.
    #[error("failed to encode params: {0}")]
    Encode(String),

    /// The namespace's auth mode needs credential material the client lacks.
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Status code of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => err.status,
            _ => None,
        }
    }

    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api(err) => Some(err.kind),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
