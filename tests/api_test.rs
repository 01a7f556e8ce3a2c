//! Provider clients against a local HTTP server.

use giftree::adapters::ReqwestHttpClient;
use giftree::api::{CatApi, TreeApi, DEFAULT_TREE_QUERY};
use giftree::error::ApiError;
use giftree::fetch::FetchController;
use giftree::view_state::TreesView;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> Arc<ReqwestHttpClient> {
    Arc::new(ReqwestHttpClient::new())
}

#[tokio::test]
async fn test_cat_gif_is_fetched_with_json_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat/gif"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "https://example.com/a.gif",
            "id": "ignored"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = CatApi::new(http(), format!("{}/cat/gif", server.uri()));
    let cat = api.fetch_cat_gif().await.unwrap();
    assert_eq!(cat.url, "https://example.com/a.gif");
}

#[tokio::test]
async fn test_non_success_status_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = CatApi::new(http(), server.uri())
        .fetch_cat_gif()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(
        err.to_string(),
        "Network response was not ok: Internal Server Error"
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = CatApi::new(http(), server.uri())
        .fetch_cat_gif()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_connection_failure_propagates() {
    // Nothing listens on port 9 (discard) in the test environment
    let err = CatApi::new(http(), "http://127.0.0.1:9/")
        .fetch_cat_gif()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_tree_search_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/plants/search"))
        .and(query_param("token", "secret token"))
        .and(query_param("q", DEFAULT_TREE_QUERY))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": 1, "common_name": "Oak", "status": "accepted", "image_url": null},
                {"id": 2, "common_name": null, "status": "unknown"}
            ],
            "links": {},
            "meta": {"total": 2}
        })))
        .mount(&server)
        .await;

    let api = TreeApi::new(http(), format!("{}/api/v1/", server.uri()), "secret token");
    let response = api.fetch_tree_data(DEFAULT_TREE_QUERY, 2).await.unwrap();

    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[0].display_name(), "Oak");
    assert_eq!(response.data[1].display_name(), "Unknown tree");
}

#[tokio::test]
async fn test_controller_over_cat_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = Arc::new(CatApi::new(http(), server.uri()));
    let controller = FetchController::new(
        move || {
            let api = Arc::clone(&api);
            async move { api.fetch_cat_gif().await }
        },
        true,
    );
    controller.mount().unwrap().await.unwrap();

    let state = controller.state();
    assert!(!state.loading);
    let error = state.error.unwrap();
    assert_eq!(
        error.message(),
        "Network response was not ok: Service Unavailable"
    );
    assert_eq!(error.downcast_ref::<ApiError>().and_then(ApiError::status), Some(503));
}

#[tokio::test]
async fn test_trees_view_fetches_one_tree_per_goal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plants/search"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": 1, "common_name": "Oak", "status": "accepted"},
                {"id": 2, "common_name": "Ash", "status": "accepted"},
                {"id": 3, "common_name": "Elm", "status": "accepted"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = Arc::new(TreeApi::new(http(), server.uri(), "t"));
    let view = TreesView::new(api, 0);
    assert!(view.mount().is_none());
    assert!(view.summary().is_none());

    view.set_completed_goals(3).unwrap().await.unwrap();

    assert_eq!(view.summary().as_deref(), Some("You planted 3 trees. Hooray!"));
}
