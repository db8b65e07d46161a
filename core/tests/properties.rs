//! Property-based tests for the request builder, encoder and classifier.

use proptest::prelude::*;
use nexmo_core::params::{decode_query, encode_json, encode_query};
use nexmo_core::request::build_request;
use nexmo_core::response::classify;
use nexmo_core::{
    AuthMode, BodyEncoding, Credentials, HttpMethod, HttpResponse, NamespaceConfig, Params,
};
use url::Url;

/// Params with unique printable keys and arbitrary string values.
fn params_strategy() -> impl Strategy<Value = Params> {
    proptest::collection::btree_map("[a-z_]{1,12}", "[ -~]{0,24}", 1..8)
        .prop_map(|map| map.into_iter().collect())
}

fn header_ns(encoding: BodyEncoding) -> NamespaceConfig {
    NamespaceConfig::new(Url::parse("https://api.nexmo.com").unwrap())
        .with_auth_mode(AuthMode::Header)
        .with_body_encoding(encoding)
}

fn creds() -> Credentials {
    Credentials::new("key", "secret").with_token("tok")
}

proptest! {
    /// Property: decoding an encoded query yields the original pairs in order.
    #[test]
    fn prop_query_round_trip(params in params_strategy()) {
        let pairs = decode_query(&encode_query(&params).unwrap()).unwrap();
        let expected: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap().to_string()))
            .collect();
        prop_assert_eq!(pairs, expected);
    }

    /// Property: GET and DELETE put params in the query and never send a body.
    #[test]
    fn prop_bodyless_methods_use_query(
        params in params_strategy(),
        method in prop_oneof![Just(HttpMethod::Get), Just(HttpMethod::Delete)],
    ) {
        let ns = header_ns(BodyEncoding::Json);
        let req = build_request(&ns, &creds(), "ua", method, "/v0.1/users", Some(&params)).unwrap();
        prop_assert!(req.body.is_none());
        let pairs = decode_query(req.query().unwrap()).unwrap();
        prop_assert_eq!(pairs.len(), params.len());
    }

    /// Property: POST and PUT in JSON mode send the JSON of params and no query.
    #[test]
    fn prop_body_methods_send_json(
        params in params_strategy(),
        method in prop_oneof![Just(HttpMethod::Post), Just(HttpMethod::Put)],
    ) {
        let ns = header_ns(BodyEncoding::Json);
        let req = build_request(&ns, &creds(), "ua", method, "/v0.1/users", Some(&params)).unwrap();
        prop_assert_eq!(req.query(), None);
        prop_assert_eq!(req.body, Some(encode_json(&params).unwrap()));
    }

    /// Property: classifying the same response twice gives the same outcome.
    #[test]
    fn prop_classification_is_repeatable(
        status in 100u16..600,
        json in any::<bool>(),
        body in "[ -~]{0,32}",
    ) {
        let content_type = if json { "application/json" } else { "text/plain" };
        let resp = HttpResponse {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.into_bytes(),
        };
        let first = classify(&resp, "api.nexmo.com");
        let second = classify(&resp, "api.nexmo.com");
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => {
                prop_assert_eq!(a.status(), b.status());
                prop_assert_eq!(a.api_kind(), b.api_kind());
                prop_assert_eq!(a.to_string(), b.to_string());
            }
            (a, b) => prop_assert!(false, "outcomes differ: {:?} vs {:?}", a, b),
        }
    }

    /// Property: every non-2xx status is an API error carrying that status.
    #[test]
    fn prop_non_success_always_fails(status in (100u16..600).prop_filter("non-2xx", |s| !(200..300).contains(s))) {
        let resp = HttpResponse { status, headers: Vec::new(), body: Vec::new() };
        let err = classify(&resp, "api.nexmo.com").unwrap_err();
        prop_assert_eq!(err.status(), Some(status));
    }
}
