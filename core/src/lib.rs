//! Synchronous client core for the Nexmo communications API.
//!
//! # Overview
//! Turns endpoint calls into signed `HttpRequest` values, sends them through
//! a `Transport`, and classifies each `HttpResponse` into a `Response` or an
//! `Error`. Building and classifying never touch the network, so callers
//! can also run the HTTP round-trip themselves (host-does-IO pattern).
//!
//! # Design
//! - `Client` is immutable after construction and cheap to clone.
//! - Each endpoint group owns a `Namespace`: host, auth mode (query params
//!   or bearer header), body encoding (form or JSON) and default headers.
//! - Pipeline: `request::build_request` → `Transport::send` →
//!   `response::classify`. No retries, no hidden state between calls.
//! - Request and response logging goes through `tracing`; installing a
//!   subscriber is up to the application.

pub mod account;
pub mod client;
pub mod config;
pub mod conversations;
pub mod credentials;
pub mod entity;
pub mod error;
pub mod files;
pub mod http;
pub mod params;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{Client, Namespace};
pub use config::{BodyEncoding, ClientConfig, NamespaceConfig};
pub use credentials::{AuthMode, Credentials};
pub use entity::Entity;
pub use error::{ApiError, ApiErrorKind, Error, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::Params;
pub use response::Response;
pub use transport::{Transport, UreqTransport};
