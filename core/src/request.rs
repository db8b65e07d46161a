//! Turns a method, path and params into a signed `HttpRequest`.

use tracing::info;

use crate::config::{BodyEncoding, NamespaceConfig};
use crate::credentials::{AuthMode, Credentials};
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{encode_form, encode_json, encode_query, Params};

/// Build the request for `method path` in namespace `config`.
///
/// Query auth adds `api_key`/`api_secret` to a copy of `params`; header auth
/// leaves them alone and sets `Authorization`. GET/DELETE params go to the
/// query string (none at all when empty), POST/PUT params to the body.
pub fn build_request(
    config: &NamespaceConfig,
    credentials: &Credentials,
    user_agent: &str,
    method: HttpMethod,
    path: &str,
    params: Option<&Params>,
) -> Result<HttpRequest> {
    let mut params = params.cloned().unwrap_or_default();
    let mut headers = vec![("User-Agent".to_string(), user_agent.to_string())];

    match config.auth_mode {
        AuthMode::Query => {
            let (key, secret) = credentials.key_pair()?;
            params.insert("api_key", key);
            params.insert("api_secret", secret);
        }
        AuthMode::Header => {
            headers.push(("Authorization".to_string(), credentials.authorization()?));
        }
    }

    let mut url = config
        .base_url
        .join(path)
        .map_err(|e| Error::Config(format!("invalid path `{path}`: {e}")))?;

    let body = if method.has_body() {
        let (content_type, body) = match config.body_encoding {
            BodyEncoding::Json => ("application/json", encode_json(&params)?),
            BodyEncoding::Form => ("application/x-www-form-urlencoded", encode_form(&params)?),
        };
        headers.push(("Content-Type".to_string(), content_type.to_string()));
        Some(body)
    } else {
        if !params.is_empty() {
            url.set_query(Some(&encode_query(&params)?));
        }
        None
    };

    headers.extend(config.headers.iter().cloned());

    info!(method = method.as_str(), path = url.path(), "Nexmo API request");

    Ok(HttpRequest {
        method,
        url: url.into(),
        headers,
        body,
    })
}
