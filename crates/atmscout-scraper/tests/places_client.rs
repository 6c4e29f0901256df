//! Integration tests for `PlacesClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made. Covers the happy paths (empty results,
//! single page, pagination), the API-status rejections, and every HTTP
//! error variant the client can propagate.

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atmscout_scraper::{PlacesClient, ScraperError};

const NEARBY_PATH: &str = "/maps/api/place/nearbysearch/json";
const DETAILS_PATH: &str = "/maps/api/place/details/json";

const MIAMI: (f64, f64) = (25.7617, -80.1918);

/// Builds a `PlacesClient` against the mock server: 5-second timeout, no
/// retries, zero page-token delay so pagination tests run instantly.
fn test_client(server: &MockServer) -> PlacesClient {
    PlacesClient::new(&server.uri(), "test-key", 5, "atmscout-test/0.1", 0, 0, 0)
        .expect("failed to build test PlacesClient")
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> PlacesClient {
    PlacesClient::new(&server.uri(), "test-key", 5, "atmscout-test/0.1", max_retries, 0, 0)
        .expect("failed to build test PlacesClient")
}

/// One-result search page fixture.
fn one_result_json(name: &str) -> serde_json::Value {
    json!({
        "status": "OK",
        "results": [{
            "place_id": format!("pid-{name}"),
            "name": name,
            "vicinity": "12 NE 1st Ave",
            "geometry": {"location": {"lat": 25.76, "lng": -80.19}},
            "rating": 4.2,
            "types": ["convenience_store", "point_of_interest"]
        }]
    })
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_nearby_returns_empty_vec_on_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let result = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await;

    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn search_nearby_returns_results_on_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("type", "convenience_store"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_result_json("QuickBuy")))
        .mount(&server)
        .await;

    let results = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "QuickBuy");
    assert_eq!(results[0].rating, Some(4.2));
    assert_eq!(
        results[0].geometry.as_ref().map(|g| g.location.lat),
        Some(25.76)
    );
}

#[tokio::test]
async fn search_nearby_follows_next_page_token() {
    let server = MockServer::start().await;

    // Page 1: one result plus a continuation token.
    let mut page1 = one_result_json("QuickBuy");
    page1["next_page_token"] = json!("token2");
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;

    // Page 2: one result, no token (last page).
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "token2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_result_json("Sunny Mart")))
        .mount(&server)
        .await;

    let results = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await
        .expect("paginated search should succeed");

    assert_eq!(results.len(), 2, "expected 2 results across 2 pages");
    assert_eq!(results[0].name, "QuickBuy");
    assert_eq!(results[1].name, "Sunny Mart");
}

#[tokio::test]
async fn search_text_sends_query_and_parses_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/textsearch/json"))
        .and(query_param("query", "bodega miami"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_result_json("La Esquina")))
        .mount(&server)
        .await;

    let results = test_client(&server)
        .search_text("bodega miami")
        .await
        .expect("text search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "La Esquina");
}

// ---------------------------------------------------------------------------
// API status rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_nearby_surfaces_request_denied_as_api_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await;

    match result.unwrap_err() {
        ScraperError::ApiStatus { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert!(message.contains("API key"));
        }
        other => panic!("expected ScraperError::ApiStatus, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// HTTP error propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_nearby_propagates_rate_limit_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await;

    match result.unwrap_err() {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 30),
        other => panic!("expected ScraperError::RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn search_nearby_rate_limit_without_header_defaults_to_60s() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await;

    match result.unwrap_err() {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 60),
        other => panic!("expected ScraperError::RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn search_nearby_retries_rate_limit_then_succeeds() {
    let server = MockServer::start().await;

    // First attempt hits the 429 mock; it is consumed after one call and
    // the retry falls through to the 200 mock.
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_result_json("QuickBuy")))
        .mount(&server)
        .await;

    let results = test_client_with_retries(&server, 2)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await
        .expect("retry should recover from transient 429");

    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn search_nearby_propagates_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await;

    assert!(
        matches!(result.unwrap_err(), ScraperError::NotFound { .. }),
        "expected ScraperError::NotFound"
    );
}

#[tokio::test]
async fn search_nearby_propagates_unexpected_status_for_5xx() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await;

    match result.unwrap_err() {
        ScraperError::UnexpectedStatus { status, .. } => assert_eq!(status, 503),
        other => panic!("expected ScraperError::UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn search_nearby_surfaces_malformed_body_as_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .search_nearby(MIAMI, 50_000, "convenience_store")
        .await;

    assert!(
        matches!(result.unwrap_err(), ScraperError::Deserialize { .. }),
        "expected ScraperError::Deserialize"
    );
}

// ---------------------------------------------------------------------------
// Place details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn place_details_returns_phone_and_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DETAILS_PATH))
        .and(query_param("place_id", "pid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "status": "OK",
            "result": {
                "formatted_phone_number": "(305) 555-0100",
                "formatted_address": "12 NE 1st Ave, Miami, FL 33132"
            }
        })))
        .mount(&server)
        .await;

    let details = test_client(&server)
        .place_details("pid-1")
        .await
        .expect("details lookup should succeed")
        .expect("details should be present");

    assert_eq!(details.formatted_phone_number.as_deref(), Some("(305) 555-0100"));
    assert_eq!(
        details.formatted_address.as_deref(),
        Some("12 NE 1st Ave, Miami, FL 33132")
    );
}

#[tokio::test]
async fn place_details_not_found_is_ok_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DETAILS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"status": "NOT_FOUND"})))
        .mount(&server)
        .await;

    let details = test_client(&server)
        .place_details("gone")
        .await
        .expect("NOT_FOUND should not be an error");

    assert!(details.is_none());
}
