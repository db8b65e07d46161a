//! Account endpoints on the REST host, authenticated with query params.

use crate::client::Namespace;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::response::Response;

#[derive(Debug, Clone)]
pub struct Account {
    ns: Namespace,
}

impl Account {
    pub(crate) fn new(ns: Namespace) -> Self {
        Self { ns }
    }

    pub fn balance(&self) -> Result<Response> {
        self.ns.request(HttpMethod::Get, "/account/get-balance", None)
    }

    /// Update the account callback URLs (`moCallBackUrl`, `drCallBackUrl`).
    pub fn update(&self, params: &Params) -> Result<Response> {
        self.ns.request(HttpMethod::Post, "/account/settings", Some(params))
    }
}
