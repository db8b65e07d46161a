//! Recording downloads.

use crate::client::Namespace;
use crate::error::Result;
use crate::http::{HttpMethod, HttpResponse};
use crate::response::Response;

#[derive(Debug, Clone)]
pub struct Files {
    ns: Namespace,
}

impl Files {
    pub(crate) fn new(ns: Namespace) -> Self {
        Self { ns }
    }

    /// Download a recording. Audio comes back as `Response::Raw`.
    pub fn get(&self, id: &str) -> Result<Response> {
        self.ns.request(HttpMethod::Get, &file_path(id), None)
    }

    /// Download a recording, passing a successful non-JSON response to
    /// `handler` (to stream it to disk, say) instead of buffering it as raw.
    pub fn get_with<F>(&self, id: &str, handler: F) -> Result<Response>
    where
        F: FnOnce(&HttpResponse) -> Response,
    {
        self.ns.request_with(HttpMethod::Get, &file_path(id), None, handler)
    }
}

fn file_path(id: &str) -> String {
    format!("/v1/files/{id}")
}
