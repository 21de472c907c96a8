//! Integration tests for the proxy source
//!
//! The proxy source is optional and unreliable by nature; every failure
//! mode must degrade to "no proxy" instead of failing the job.

use storescout::config;
use storescout::proxy::{ProxyPool, MAX_PROXIES};
use storescout::sitemap::build_http_client;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    build_http_client(config::USER_AGENT).expect("client should build")
}

#[tokio::test]
async fn test_fetch_caps_the_pool_at_five() {
    let server = MockServer::start().await;

    let proxies: Vec<serde_json::Value> = (0..8)
        .map(|i| serde_json::json!({ "proxy": format!("http://10.0.0.{}:3128", i) }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/proxies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "proxies": proxies
        })))
        .mount(&server)
        .await;

    let source_url = format!("{}/proxies", server.uri());
    let pool = ProxyPool::fetch(&client(), Some(&source_url)).await;

    assert_eq!(pool.len(), MAX_PROXIES);
    assert!(pool.pick().is_some());
}

#[tokio::test]
async fn test_unconfigured_source_means_no_proxy() {
    let pool = ProxyPool::fetch(&client(), None).await;
    assert!(pool.is_empty());
    assert_eq!(pool.pick(), None);
}

#[tokio::test]
async fn test_unreachable_source_degrades_to_empty() {
    // Nothing is listening on this port
    let pool = ProxyPool::fetch(&client(), Some("http://127.0.0.1:9/proxies")).await;
    assert!(pool.is_empty());
}

#[tokio::test]
async fn test_bad_payload_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let source_url = format!("{}/proxies", server.uri());
    let pool = ProxyPool::fetch(&client(), Some(&source_url)).await;
    assert!(pool.is_empty());
}
