//! Integration tests for the reqwest transport against a wiremock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prodcat::{
    CatalogGateway, NetworkError, Prodcat, ProdcatError, ProductCatalog, QueryParams, RetryPolicy,
};

fn catalog_body() -> serde_json::Value {
    json!({
        "code": 200,
        "data": {
            "total": 2,
            "products": [
                {
                    "product_no": "SKU-1",
                    "product_status_name": "Active",
                    "product_type_name": "Bag"
                },
                {"product_no": "SKU-2", "product_status_name": "Sold out", "product_type_name": ""}
            ]
        }
    })
}

fn gateway(server: &MockServer, policy: RetryPolicy) -> CatalogGateway {
    Prodcat::builder()
        .base_url(format!("{}/api", server.uri()))
        .retry_policy(policy)
        .build()
        .unwrap()
}

fn quick_retries() -> RetryPolicy {
    RetryPolicy::new()
        .max_attempts(3)
        .delay(Duration::from_millis(20))
        .timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn fetches_catalog_with_default_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/product/list"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "100"))
        .and(query_param("attribute", "0"))
        .and(query_param("upload", "0"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = gateway(&server, quick_retries());
    let payload = catalog.get_catalog(&QueryParams::new(), false).await.unwrap();

    assert_eq!(payload.products().len(), 2);
    assert_eq!(payload.data.extra["total"], 2);
    assert_eq!(payload.extra["code"], 200);
    // Empty type label reads as absent
    assert_eq!(payload.products()[1].type_label(), None);
}

#[tokio::test]
async fn stats_request_large_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/product/list"))
        .and(query_param("page_size", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = gateway(&server, quick_retries());
    let stats = catalog.get_stats().await.unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_status["Sold out"], 1);
    assert_eq!(stats.by_type[prodcat::types::UNKNOWN_LABEL], 1);
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/product/list"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/product/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = gateway(&server, quick_retries());
    let found = catalog.search_by_identifier("sku-2", true).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].status_label(), Some("Sold out"));
}

#[tokio::test]
async fn persistent_server_error_exhausts_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/product/list"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let catalog = gateway(&server, quick_retries());
    let err = catalog
        .get_catalog(&QueryParams::new(), false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProdcatError::Network(NetworkError::HttpStatus(503))
    ));
}

#[tokio::test]
async fn malformed_body_fails_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/product/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = gateway(&server, quick_retries());
    let err = catalog
        .get_catalog(&QueryParams::new(), false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProdcatError::Network(NetworkError::MalformedResponse(_))
    ));
    assert_eq!(err.user_message(), "unexpected response from server");
}

#[tokio::test]
async fn slow_responses_time_out_per_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/product/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalog_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let policy = RetryPolicy::new()
        .max_attempts(2)
        .delay(Duration::from_millis(20))
        .timeout(Duration::from_millis(200));
    let catalog = gateway(&server, policy);

    let started = std::time::Instant::now();
    let err = catalog
        .get_catalog(&QueryParams::new(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, ProdcatError::Network(NetworkError::Timeout)));
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn unreachable_host_is_a_connection_failure() {
    // Bind then drop a listener so the port refuses connections.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let catalog = Prodcat::builder()
        .base_url(uri)
        .retry_policy(RetryPolicy::disabled())
        .build()
        .unwrap();
    let err = catalog
        .get_catalog(&QueryParams::new(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, ProdcatError::Network(NetworkError::Unknown(_))));
    assert_eq!(err.user_message(), "connection failed");
}
