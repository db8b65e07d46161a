//! The client and the namespace plumbing every endpoint group shares.
//!
//! # Design
//! `Client` holds the immutable configuration and a transport behind `Arc`s,
//! so it is cheap to clone and safe to share across threads. A `Namespace`
//! pairs the client with one `NamespaceConfig` and runs the pipeline:
//! build → send → classify, strictly in sequence, one request per call.
//!
//! Callers that execute HTTP themselves can stop after `Namespace::build`
//! and resume with `Namespace::parse`; neither step touches the network.

use std::fmt;
use std::sync::Arc;

use crate::account::Account;
use crate::config::{BodyEncoding, ClientConfig, NamespaceConfig};
use crate::conversations::Conversations;
use crate::credentials::AuthMode;
use crate::error::Result;
use crate::files::Files;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::Params;
use crate::request::build_request;
use crate::response::{classify, classify_with, Response};
use crate::transport::{Transport, UreqTransport};

/// Entry point to the API.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    user_agent: Arc<str>,
    api: NamespaceConfig,
    rest: NamespaceConfig,
}

impl Client {
    /// Client using the blocking ureq transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Result<Self> {
        let api = NamespaceConfig::new(config.api_base_url()?)
            .with_auth_mode(AuthMode::Header)
            .with_body_encoding(BodyEncoding::Json)
            .with_header("Accept", "application/json");
        let rest = NamespaceConfig::new(config.rest_base_url()?);
        Ok(Self {
            user_agent: config.user_agent().into(),
            config: Arc::new(config),
            transport: Arc::new(transport),
            api,
            rest,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn conversations(&self) -> Conversations {
        Conversations::new(self.namespace(self.api.clone()))
    }

    pub fn files(&self) -> Files {
        Files::new(self.namespace(self.api.clone()))
    }

    pub fn account(&self) -> Account {
        Account::new(self.namespace(self.rest.clone()))
    }

    /// A namespace with custom settings, for endpoints without a wrapper.
    pub fn namespace(&self, config: NamespaceConfig) -> Namespace {
        Namespace {
            client: self.clone(),
            config,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("api", &self.api.base_url.as_str())
            .field("rest", &self.rest.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// A group of endpoints sharing host, auth mode and body encoding.
#[derive(Clone, Debug)]
pub struct Namespace {
    client: Client,
    config: NamespaceConfig,
}

impl Namespace {
    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Build the signed request without sending it.
    pub fn build(&self, method: HttpMethod, path: &str, params: Option<&Params>) -> Result<HttpRequest> {
        build_request(
            &self.config,
            &self.client.config.credentials,
            &self.client.user_agent,
            method,
            path,
            params,
        )
    }

    /// Classify a response received for a request from `build`.
    pub fn parse(&self, response: &HttpResponse) -> Result<Response> {
        classify(response, self.config.host())
    }

    pub fn request(&self, method: HttpMethod, path: &str, params: Option<&Params>) -> Result<Response> {
        let response = self.send(method, path, params)?;
        self.parse(&response)
    }

    /// Like `request`, with `fallback` handling successful non-JSON bodies.
    pub fn request_with<F>(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Params>,
        fallback: F,
    ) -> Result<Response>
    where
        F: FnOnce(&HttpResponse) -> Response,
    {
        let response = self.send(method, path, params)?;
        classify_with(&response, self.config.host(), fallback)
    }

    fn send(&self, method: HttpMethod, path: &str, params: Option<&Params>) -> Result<HttpResponse> {
        let request = self.build(method, path, params)?;
        Ok(self.client.transport.send(&request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use crate::error::{ApiErrorKind, Error, TransportError};
    use std::sync::Mutex;

    /// Records every request and answers with a canned response.
    struct Canned {
        response: std::result::Result<HttpResponse, String>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, content_type: &str, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(HttpResponse {
                    status,
                    headers: vec![("Content-Type".to_string(), content_type.to_string())],
                    body: body.as_bytes().to_vec(),
                }),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                response: Err("connection refused".to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for Arc<Canned> {
        fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.response.clone().map_err(|message| TransportError::Request {
                url: request.url.clone(),
                message,
            })
        }
    }

    fn client(transport: Arc<Canned>) -> Client {
        let config = ClientConfig::new(Credentials::new("key", "secret").with_token("tok"));
        Client::with_transport(config, transport).unwrap()
    }

    #[test]
    fn api_namespace_uses_bearer_and_json() {
        let transport = Canned::new(200, "application/json", r#"{"id":"CON-1"}"#);
        let client = client(transport.clone());

        let params = Params::new().with("name", "support");
        let resp = client
            .conversations()
            .create(&params)
            .unwrap();
        assert_eq!(resp.entity().unwrap()["id"], "CON-1");

        let req = transport.last();
        assert_eq!(req.url, "https://api.nexmo.com/v0.1/conversations");
        assert_eq!(req.header("Authorization"), Some("Bearer tok"));
        assert_eq!(req.header("Accept"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"support"}"#));
    }

    #[test]
    fn rest_namespace_uses_query_auth() {
        let transport = Canned::new(200, "application/json", r#"{"value":10.5}"#);
        let client = client(transport.clone());

        client.account().balance().unwrap();

        let req = transport.last();
        assert_eq!(
            req.url,
            "https://rest.nexmo.com/account/get-balance?api_key=key&api_secret=secret"
        );
        assert_eq!(req.header("Authorization"), None);
    }

    #[test]
    fn sub_resources_build_their_paths() {
        let transport = Canned::new(204, "text/plain", "");
        let conversations = client(transport.clone()).conversations();
        let params = Params::new().with("type", "text");

        conversations.events().create("CON-1", &params).unwrap();
        assert_eq!(transport.last().url, "https://api.nexmo.com/v0.1/conversations/CON-1/events");

        conversations.events().delete("CON-1", "EVE-2").unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "https://api.nexmo.com/v0.1/conversations/CON-1/events/EVE-2");

        conversations.members().update("CON-1", "MEM-3", &params).unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "https://api.nexmo.com/v0.1/conversations/CON-1/members/MEM-3");

        conversations.users().conversations("USR-4").unwrap();
        assert_eq!(transport.last().url, "https://api.nexmo.com/v0.1/users/USR-4/conversations");

        conversations
            .record("CON-1", &Params::new().with("action", "stop"))
            .unwrap();
        assert_eq!(transport.last().url, "https://api.nexmo.com/v1/conversations/CON-1/record");
    }

    #[test]
    fn transport_failure_is_not_an_api_error() {
        let client = client(Canned::unreachable());
        let err = client.conversations().list(None).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn api_errors_name_the_host() {
        let client = client(Canned::new(403, "application/json", "{}"));
        let err = client.conversations().get("CON-1").unwrap_err();
        assert_eq!(err.api_kind(), Some(ApiErrorKind::Client));
        assert!(matches!(&err, Error::Api(e) if e.message == "403 response from api.nexmo.com"));
    }

    #[test]
    fn build_and_parse_work_without_transport() {
        let transport = Canned::new(204, "text/plain", "");
        let ns = client(transport.clone()).conversations().namespace().clone();

        let req = ns.build(HttpMethod::Delete, "/v0.1/conversations/CON-1", None).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(transport.seen.lock().unwrap().is_empty());

        let resp = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert!(ns.parse(&resp).unwrap().is_no_content());
    }

    #[test]
    fn bad_host_fails_at_construction() {
        let config = ClientConfig::new(Credentials::default()).with_api_host("http://");
        let err = Client::with_transport(config, Canned::new(200, "text/plain", "")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
