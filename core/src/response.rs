//! Classifies an `HttpResponse` into a `Response` or an error.

use tracing::info;

use crate::entity::Entity;
use crate::error::{ApiError, Error, Result};
use crate::http::HttpResponse;

/// Outcome of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// 204.
    NoContent,
    /// 2xx with a JSON body.
    Entity(Entity),
    /// 2xx with any other body.
    Raw(Vec<u8>),
}

impl Response {
    pub fn entity(&self) -> Option<&Entity> {
        match self {
            Response::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Response::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Response::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, Response::NoContent)
    }
}

/// Classify `response`, returned by `host`.
pub fn classify(response: &HttpResponse, host: &str) -> Result<Response> {
    classify_with(response, host, |response| Response::Raw(response.body.clone()))
}

/// Like `classify`, but hands successful non-JSON responses to `fallback`
/// instead of returning their raw body.
pub fn classify_with<F>(response: &HttpResponse, host: &str, fallback: F) -> Result<Response>
where
    F: FnOnce(&HttpResponse) -> Response,
{
    info!(
        host,
        status = response.status,
        content_type = response.content_type(),
        content_length = response.content_length(),
        trace_id = response.trace_id(),
        "Nexmo API response"
    );

    match response.status {
        204 => Ok(Response::NoContent),
        200..=299 => parse_success(response, fallback),
        status => Err(ApiError::from_status(status, host).into()),
    }
}

fn parse_success<F>(response: &HttpResponse, fallback: F) -> Result<Response>
where
    F: FnOnce(&HttpResponse) -> Response,
{
    let is_json = response
        .content_type()
        .is_some_and(|media| media.eq_ignore_ascii_case("application/json"));
    if !is_json {
        return Ok(fallback(response));
    }

    serde_json::from_slice(&response.body)
        .map(Response::Entity)
        .map_err(|source| Error::Parse {
            source,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
}
