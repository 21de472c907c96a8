//! Integration tests for sitemap discovery
//!
//! These run against wiremock servers standing in for the storefront.

use std::io::Write;
use storescout::config;
use storescout::sitemap::{build_http_client, discover_products};
use storescout::SitemapError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    build_http_client(config::USER_AGENT).expect("client should build")
}

async fn mount_robots(server: &MockServer, sitemap_path: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /cart\nSitemap: {}{}",
            server.uri(),
            sitemap_path
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_urlset_discovery_keeps_only_product_locations() {
    let server = MockServer::start().await;
    mount_robots(&server, "/sitemap.xml").await;

    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/products/1</loc></url>
  <url><loc>{base}/products/2</loc></url>
  <url><loc>{base}/p/3</loc></url>
  <url><loc>{base}/about-us</loc></url>
  <url><loc>{base}/collections/summer</loc></url>
</urlset>"#,
        base = server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let products = discover_products(&client(), &server.uri()).await.unwrap();

    assert_eq!(products.len(), 3);
    assert!(products.contains(&format!("{}/products/1", server.uri())));
    assert!(products.contains(&format!("{}/products/2", server.uri())));
    assert!(products.contains(&format!("{}/p/3", server.uri())));
}

#[tokio::test]
async fn test_index_recurses_into_product_hinted_children_only() {
    let server = MockServer::start().await;
    mount_robots(&server, "/sitemap_index.xml").await;

    let index = format!(
        r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/sitemap_products_1.xml</loc></sitemap>
  <sitemap><loc>{base}/sitemap_pages_1.xml</loc></sitemap>
</sitemapindex>"#,
        base = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index))
        .mount(&server)
        .await;

    let products_body = format!(
        r#"<urlset><url><loc>{base}/products/1</loc></url><url><loc>{base}/products/2</loc></url></urlset>"#,
        base = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/sitemap_products_1.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(products_body))
        .mount(&server)
        .await;

    // The non-product child must never be requested
    Mock::given(method("GET"))
        .and(path("/sitemap_pages_1.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
        .expect(0)
        .mount(&server)
        .await;

    let products = discover_products(&client(), &server.uri()).await.unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_index_falls_back_to_all_children_when_none_hint_products() {
    let server = MockServer::start().await;
    mount_robots(&server, "/sitemap_index.xml").await;

    let index = format!(
        r#"<sitemapindex><sitemap><loc>{base}/sitemap_misc.xml</loc></sitemap></sitemapindex>"#,
        base = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index))
        .mount(&server)
        .await;

    let misc = format!(
        r#"<urlset><url><loc>{base}/item/7</loc></url><url><loc>{base}/faq</loc></url></urlset>"#,
        base = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/sitemap_misc.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(misc))
        .mount(&server)
        .await;

    let products = discover_products(&client(), &server.uri()).await.unwrap();
    assert_eq!(products.len(), 1);
    assert!(products.contains(&format!("{}/item/7", server.uri())));
}

#[tokio::test]
async fn test_gzip_compressed_sitemap() {
    let server = MockServer::start().await;
    mount_robots(&server, "/sitemap.xml.gz").await;

    let body = format!(
        r#"<urlset><url><loc>{base}/products/1</loc></url></urlset>"#,
        base = server.uri()
    );
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(body.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed)
                .insert_header("content-type", "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let products = discover_products(&client(), &server.uri()).await.unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn test_missing_robots_is_an_error_not_a_panic() {
    let server = MockServer::start().await;
    // No robots.txt mounted: wiremock answers 404

    let result = discover_products(&client(), &server.uri()).await;
    assert!(matches!(result, Err(SitemapError::Robots(_))));
}

#[tokio::test]
async fn test_robots_without_directive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"))
        .mount(&server)
        .await;

    let result = discover_products(&client(), &server.uri()).await;
    assert!(matches!(result, Err(SitemapError::NoDirective)));
}

#[tokio::test]
async fn test_non_sitemap_payload() {
    let server = MockServer::start().await;
    mount_robots(&server, "/sitemap.xml").await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = discover_products(&client(), &server.uri()).await;
    assert!(matches!(result, Err(SitemapError::UnsupportedFormat)));
}
