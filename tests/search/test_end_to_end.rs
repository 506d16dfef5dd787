// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end select and ping against an in-process gateway

use std::collections::HashSet;
use std::time::Duration;

use signed_solr_client::search::{RequestInterceptor, RequestOptions, StaticHeaders};
use signed_solr_client::{
    RequestDescriptor, Result, SearchClientConfig, SearchError, SearchParams, SignatureAlgorithm,
    TransportError,
};

use super::gateway::{client_for, Gateway, Reply, DERIVED_KEY, INDEX_ID};

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_select_bare_string_is_signed_get() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    let result = client.select("hello world").await.unwrap();
    assert_eq!(result["response"]["numFound"], 1);
    assert_eq!(result["response"]["docs"][0]["id"], "doc-1");

    let request = gateway.last();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, format!("/solr/{}/select", INDEX_ID));
    assert!(request.body.is_empty());
    assert_eq!(
        request.params(),
        pairs(&[
            ("q", "hello world"),
            ("wt", "json"),
            ("json.nl", "json"),
            ("defType", "edismax"),
            ("rows", "10"),
            ("start", "0"),
        ])
    );
    assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
}

#[tokio::test]
async fn test_select_oversized_query_is_signed_post() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    let query = "x".repeat(4000);
    client
        .select(SearchParams::new().with("q", query.clone()))
        .await
        .unwrap();

    let request = gateway.last();
    assert_eq!(request.method, "POST");
    assert!(request.query.is_none());
    assert!(request
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("application/x-www-form-urlencoded"));
    assert_eq!(
        request.params(),
        pairs(&[
            ("q", query.as_str()),
            ("wt", "json"),
            ("json.nl", "json"),
            ("defType", "edismax"),
            ("rows", "10"),
            ("start", "0"),
        ])
    );
    assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
}

#[tokio::test]
async fn test_select_preserves_local_params_and_multi_values() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    let mut params = SearchParams::new().with("q", "{!lucene q.op=AND}title:rust");
    params.append("fq", "{!tag=type}type:article");
    params.append("fq", "lang:en");
    client.select(params).await.unwrap();

    let request = gateway.last();
    assert_eq!(request.method, "GET");
    let received = request.params();
    assert_eq!(received[0], ("q".to_string(), "{!lucene q.op=AND}title:rust".to_string()));
    let filters: Vec<&str> = received
        .iter()
        .filter(|(k, _)| k == "fq")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(filters, vec!["{!tag=type}type:article", "lang:en"]);
    assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
}

#[tokio::test]
async fn test_ping_without_params() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    let result = client.ping().await.unwrap();
    assert!(result.is_null());

    let request = gateway.last();
    assert_eq!(request.method, "HEAD");
    assert_eq!(request.path, format!("/solr/{}/admin/ping", INDEX_ID));
    assert_eq!(request.query.as_deref(), Some("wt=json"));
    assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
}

#[tokio::test]
async fn test_ping_with_extra_params_and_headers() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    client
        .ping_with(
            SearchParams::new().with("distrib", "false"),
            Some(vec![("X-Request-Id".to_string(), "ping-1".to_string())]),
            RequestOptions::with_timeout(Duration::from_secs(2)),
        )
        .await
        .unwrap();

    let request = gateway.last();
    assert_eq!(request.query.as_deref(), Some("distrib=false&wt=json"));
    assert!(request
        .headers
        .iter()
        .any(|(k, v)| k == "x-request-id" && v == "ping-1"));
}

#[tokio::test]
async fn test_custom_base_path() {
    let gateway = Gateway::start(Reply::Json).await;
    let mut config = gateway.config();
    config.base_path = Some("/search/core1".to_string());
    let client = client_for(config);

    client.select("rust").await.unwrap();
    client.ping().await.unwrap();

    let requests = gateway.requests();
    assert_eq!(requests[0].path, "/search/core1/select");
    assert_eq!(requests[1].path, "/search/core1/admin/ping");
}

#[tokio::test]
async fn test_sha256_signatures_verify() {
    let gateway = Gateway::start(Reply::Json).await;
    let mut config = gateway.config();
    config.signature_algorithm = SignatureAlgorithm::HmacSha256;
    let client = client_for(config);

    client.select("rust").await.unwrap();
    let request = gateway.last();
    assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha256));
    assert!(!request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
}

#[tokio::test]
async fn test_wrong_key_does_not_verify() {
    let gateway = Gateway::start(Reply::Json).await;
    gateway.client().select("rust").await.unwrap();
    assert!(!gateway
        .last()
        .signature_valid("some-other-key", SignatureAlgorithm::HmacSha1));
}

#[tokio::test]
async fn test_repeated_request_is_signed_afresh() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    client.select("same query").await.unwrap();
    client.select("same query").await.unwrap();

    let requests = gateway.requests();
    assert_eq!(requests[0].query, requests[1].query);
    assert_ne!(
        requests[0].cookie_value("acquia_solr_nonce"),
        requests[1].cookie_value("acquia_solr_nonce")
    );
    assert_ne!(
        requests[0].cookie_value("acquia_solr_hmac"),
        requests[1].cookie_value("acquia_solr_hmac")
    );
}

#[tokio::test]
async fn test_concurrent_selects_use_distinct_nonces() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    let queries: Vec<String> = (0..20).map(|i| format!("query {}", i)).collect();
    let results = client.select_many(queries).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let requests = gateway.requests();
    assert_eq!(requests.len(), 20);
    let nonces: HashSet<String> = requests
        .iter()
        .filter_map(|r| r.cookie_value("acquia_solr_nonce"))
        .collect();
    assert_eq!(nonces.len(), 20);
    assert!(requests
        .iter()
        .all(|r| r.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1)));
}

#[tokio::test]
async fn test_client_shared_across_tasks() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = std::sync::Arc::new(gateway.client());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.select(format!("task {}", i)).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(gateway.requests().len(), 8);
}

#[tokio::test]
async fn test_derived_key_never_transmitted() {
    let gateway = Gateway::start(Reply::Json).await;
    let client = gateway.client();

    client.select("hello").await.unwrap();
    client.select("y".repeat(5000)).await.unwrap();
    client.ping().await.unwrap();

    for request in gateway.requests() {
        assert!(!request.body.contains(DERIVED_KEY));
        assert!(!request.query.unwrap_or_default().contains(DERIVED_KEY));
        assert!(request.headers.iter().all(|(_, v)| !v.contains(DERIVED_KEY)));
    }
}

#[tokio::test]
async fn test_extra_interceptor_runs_on_every_request() {
    let gateway = Gateway::start(Reply::Json).await;
    let mut client = gateway.client();
    client.add_interceptor(std::sync::Arc::new(StaticHeaders::new(vec![(
        "X-Tenant".to_string(),
        "acme".to_string(),
    )])));

    client.select("rust").await.unwrap();
    client.ping().await.unwrap();

    for request in gateway.requests() {
        assert!(request.headers.iter().any(|(k, v)| k == "x-tenant" && v == "acme"));
        assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
    }
}

/// Adds a tracing parameter to every request
struct TraceParam;

impl RequestInterceptor for TraceParam {
    fn before_send(&self, request: &mut RequestDescriptor) -> Result<()> {
        let query = match request.url.query() {
            Some(query) => format!("{}&trace=on", query),
            None => "trace=on".to_string(),
        };
        request.url.set_query(Some(&query));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "trace-param"
    }
}

#[tokio::test]
async fn test_interceptor_cookie_does_not_break_signature() {
    let gateway = Gateway::start(Reply::Json).await;
    let mut client = gateway.client();
    client.add_interceptor(std::sync::Arc::new(StaticHeaders::new(vec![(
        "Cookie".to_string(),
        "session=abc".to_string(),
    )])));

    client.select("rust").await.unwrap();

    let request = gateway.last();
    assert_eq!(request.cookie_value("session").as_deref(), Some("abc"));
    assert!(request.cookie_value("acquia_solr_nonce").is_some());
    assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
}

#[tokio::test]
async fn test_signature_covers_interceptor_url_changes() {
    let gateway = Gateway::start(Reply::Json).await;
    let mut client = gateway.client();
    client.add_interceptor(std::sync::Arc::new(TraceParam));

    client.select("rust").await.unwrap();
    client.ping().await.unwrap();

    for request in gateway.requests() {
        assert!(request.query.as_deref().unwrap().ends_with("&trace=on"));
        assert!(request.signature_valid(DERIVED_KEY, SignatureAlgorithm::HmacSha1));
    }
}

#[tokio::test]
async fn test_error_status_surfaces_as_transport_error() {
    let gateway = Gateway::start(Reply::Status(500)).await;
    let err = gateway.client().select("rust").await.unwrap_err();

    match err {
        SearchError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "gateway error");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn test_invalid_json_surfaces_as_decode_error() {
    let gateway = Gateway::start(Reply::Garbage).await;
    let err = gateway.client().select("rust").await.unwrap_err();
    assert!(matches!(err, SearchError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(SearchClientConfig::new(
        format!("http://{}", addr),
        INDEX_ID,
        DERIVED_KEY,
    ));
    let err = client.ping().await.unwrap_err();
    assert!(matches!(
        err,
        SearchError::Transport(TransportError::Network { .. })
    ));
}
