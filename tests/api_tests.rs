use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::json;

use cinematch_api::cache::{create_redis_client, Cache};
use cinematch_api::catalog::{EmbeddingMatrix, MovieCatalog};
use cinematch_api::index::SimilarityIndex;
use cinematch_api::models::CatalogMovie;
use cinematch_api::routes::{create_router, AppState};
use cinematch_api::services::{PosterResolver, TmdbProvider};

fn movie(id: u64, title: &str) -> CatalogMovie {
    CatalogMovie {
        id,
        title: title.to_string(),
    }
}

/// Server over a four-movie catalog with strictly decreasing similarity to
/// "Inception": Interstellar, The Prestige, Paddington. Redis and TMDB point
/// at unreachable addresses, so caching degrades to misses and every poster
/// resolves to the placeholder.
async fn create_test_server() -> TestServer {
    let redis_client = create_redis_client("redis://127.0.0.1:1").unwrap();
    let (cache, _writer) = Cache::new(redis_client).await;

    let metadata = TmdbProvider::new(
        cache.clone(),
        "test_key".to_string(),
        "http://127.0.0.1:1".to_string(),
    )
    .unwrap()
    .with_retry(1, Duration::ZERO);
    let posters = PosterResolver::new(cache, "http://127.0.0.1:1".to_string()).unwrap();

    let movies = vec![
        movie(1, "Inception"),
        movie(2, "Interstellar"),
        movie(3, "The Prestige"),
        movie(4, "Paddington"),
    ];
    let matrix = EmbeddingMatrix::from_rows(vec![
        vec![1.0, 0.0],
        vec![4.0, 1.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
    ])
    .unwrap();

    let index = SimilarityIndex::build(&matrix);
    let catalog = MovieCatalog::new(movies, matrix).unwrap();

    let state = AppState {
        catalog: Arc::new(catalog),
        index: Arc::new(index),
        metadata: Arc::new(metadata),
        posters: Arc::new(posters),
        default_k: 5,
    };

    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_movies_listing_in_row_order() {
    let server = create_test_server().await;
    let response = server.get("/api/v1/movies").await;

    response.assert_status_ok();
    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 4);
    assert_eq!(movies[0]["title"], "Inception");
    assert_eq!(movies[3]["title"], "Paddington");
    assert_eq!(movies[1]["id"], 2);
}

#[tokio::test]
async fn test_recommendations_ordered_by_similarity() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Inception")
        .add_query_param("k", 2)
        .await;

    response.assert_status_ok();
    let results: Vec<serde_json::Value> = response.json();

    let titles: Vec<&str> = results
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Interstellar", "The Prestige"]);
    assert!(results[0]["score"].as_f64().unwrap() >= results[1]["score"].as_f64().unwrap());
    // Offline TMDB means every poster is the embedded placeholder.
    assert!(results[0]["poster"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_recommendations_default_k_caps_at_catalog_size() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Inception")
        .await;

    response.assert_status_ok();
    let results: Vec<serde_json::Value> = response.json();
    // default_k is 5 but only three other movies exist
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|m| m["title"] != "Inception"));
}

#[tokio::test]
async fn test_recommendations_unknown_title_is_404() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "NoSuchMovie123")
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("NoSuchMovie123"));
}

#[tokio::test]
async fn test_recommendations_zero_k_is_400() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Inception")
        .add_query_param("k", 0)
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server().await;
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("f3b9c2ce-96a7-4d3e-8f34-cb1a1d1a2b3c"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "f3b9c2ce-96a7-4d3e-8f34-cb1a1d1a2b3c"
    );
}

#[tokio::test]
async fn test_request_id_is_generated_when_absent() {
    let server = create_test_server().await;
    let response = server.get("/health").await;

    response.assert_status_ok();
    let header = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_interaction_select_updates_session() {
    let server = create_test_server().await;
    let response = server
        .post("/api/v1/interactions")
        .json(&json!({
            "action": { "type": "select", "title": "Inception" }
        }))
        .await;

    response.assert_status_ok();
    let outcome: serde_json::Value = response.json();
    assert_eq!(outcome["session"]["history"], json!(["Inception"]));
    assert_eq!(outcome["session"]["locked"], false);
    assert_eq!(outcome["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_interaction_open_while_locked_is_noop() {
    let server = create_test_server().await;
    let response = server
        .post("/api/v1/interactions")
        .json(&json!({
            "session": { "history": ["Inception"], "locked": true },
            "action": { "type": "open", "title": "Interstellar" }
        }))
        .await;

    response.assert_status_ok();
    let outcome: serde_json::Value = response.json();
    assert_eq!(outcome["session"]["history"], json!(["Inception"]));
    assert!(outcome["recommendations"].is_null());
}

#[tokio::test]
async fn test_interaction_back_pops_to_previous_view() {
    let server = create_test_server().await;
    let response = server
        .post("/api/v1/interactions")
        .json(&json!({
            "session": {
                "history": ["Inception", "Paddington"],
                "last_selected": "Paddington",
                "last_opened": "Paddington",
                "locked": true
            },
            "action": { "type": "back" }
        }))
        .await;

    response.assert_status_ok();
    let outcome: serde_json::Value = response.json();
    assert_eq!(outcome["session"]["history"], json!(["Inception"]));
    assert_eq!(outcome["session"]["last_selected"], "Inception");
    assert_eq!(outcome["session"]["last_opened"], serde_json::Value::Null);
    assert_eq!(outcome["session"]["locked"], false);
    assert_eq!(outcome["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_interaction_back_at_root_resets_home() {
    let server = create_test_server().await;
    let response = server
        .post("/api/v1/interactions")
        .json(&json!({
            "session": { "history": ["Inception"], "last_selected": "Inception" },
            "action": { "type": "back" }
        }))
        .await;

    response.assert_status_ok();
    let outcome: serde_json::Value = response.json();
    assert_eq!(outcome["session"]["history"], json!([]));
    assert_eq!(outcome["recommendations"], json!([]));
}

#[tokio::test]
async fn test_interaction_select_empty_title_is_400() {
    let server = create_test_server().await;
    let response = server
        .post("/api/v1/interactions")
        .json(&json!({
            "action": { "type": "select", "title": "" }
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}
