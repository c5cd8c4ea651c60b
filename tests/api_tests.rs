use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use taketwo_api::{
    db::connect_in_memory,
    error::{AppError, AppResult},
    models::RatingScale,
    routes::{create_router, AppState},
    services::{providers::QueryParams, MetadataProvider},
};

/// Canned upstream responses keyed by endpoint; unknown endpoints fail
#[derive(Default)]
struct StubProvider {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl StubProvider {
    fn with(mut self, endpoint: &str, body: Value) -> Self {
        self.responses.insert(endpoint.to_string(), body);
        self
    }
}

#[async_trait::async_trait]
impl MetadataProvider for StubProvider {
    async fn fetch(&self, endpoint: &str, params: QueryParams) -> AppResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params));
        self.responses
            .get(endpoint)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi(format!("no stub for {}", endpoint)))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn movie(id: i64, vote_average: f64, vote_count: u64) -> Value {
    json!({ "id": id, "title": format!("Movie {}", id), "vote_average": vote_average, "vote_count": vote_count })
}

async fn create_test_server(provider: StubProvider) -> (TestServer, Arc<StubProvider>) {
    let provider = Arc::new(provider);
    let pool = connect_in_memory().await.unwrap();
    let state = AppState::new(pool, provider.clone(), RatingScale::default());
    let server = TestServer::new(create_router(Arc::new(state))).unwrap();
    (server, provider)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server(StubProvider::default()).await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let (server, _) = create_test_server(StubProvider::default()).await;

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc-123"),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "abc-123");
}

#[tokio::test]
async fn test_popular_passthrough_with_page() {
    let provider = StubProvider::default().with(
        "/movie/popular",
        json!({ "page": 3, "results": [movie(1, 7.0, 10)], "total_pages": 500 }),
    );
    let (server, provider) = create_test_server(provider).await;

    let response = server.get("/movies/popular").add_query_param("page", 3).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_pages"], 500);

    let calls = provider.calls.lock().unwrap();
    assert_eq!(calls[0].1, vec![("page".to_string(), "3".to_string())]);
}

#[tokio::test]
async fn test_search_wraps_results() {
    let provider = StubProvider::default().with(
        "/search/movie",
        json!({ "page": 1, "results": [{ "id": 603, "title": "The Matrix" }], "total_results": 1 }),
    );
    let (server, _) = create_test_server(provider).await;

    let response = server.get("/movies/search").add_query_param("q", "matrix").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "results": [{ "id": 603, "title": "The Matrix" }] }));
}

#[tokio::test]
async fn test_search_blank_query_rejected() {
    let (server, _) = create_test_server(StubProvider::default()).await;
    let response = server.get("/movies/search").add_query_param("q", " ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_details_upstream_failure_is_bad_gateway() {
    let (server, _) = create_test_server(StubProvider::default()).await;
    let response = server.get("/movies/550").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_favorites_flow() {
    let provider = StubProvider::default().with("/movie/550", json!({ "id": 550, "title": "Fight Club" }));
    let (server, _) = create_test_server(provider).await;

    let response = server.post("/favorites").json(&json!({ "movie_id": 550 })).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["message"], "Added to favorites");

    // Second add is a duplicate
    let response = server.post("/favorites").json(&json!({ "movie_id": 550 })).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/favorites").await;
    response.assert_status_ok();
    let favorites: Vec<Value> = response.json();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["movie"]["title"], "Fight Club");
    assert!(favorites[0]["created_at"].is_string());

    server.delete("/favorites/550").await.assert_status_ok();
    server
        .delete("/favorites/550")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ratings_create_then_update() {
    let (server, _) = create_test_server(StubProvider::default()).await;

    let response = server
        .post("/ratings")
        .json(&json!({ "movie_id": 680, "rating": 4, "comment": "good" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["message"], "Rating added");

    let response = server
        .post("/ratings")
        .json(&json!({ "movie_id": 680, "rating": 2.5 }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "Rating updated");

    let ratings: Vec<Value> = server.get("/ratings").await.json();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["rating"], 2.5);
    assert_eq!(ratings[0]["comment"], Value::Null);
    // No stub for /movie/680
    assert_eq!(ratings[0]["movie"], Value::Null);
}

#[tokio::test]
async fn test_rating_out_of_scale_rejected() {
    let (server, _) = create_test_server(StubProvider::default()).await;

    let response = server
        .post("/ratings")
        .json(&json!({ "movie_id": 680, "rating": 9 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let ratings: Vec<Value> = server.get("/ratings").await.json();
    assert!(ratings.is_empty());
}

#[tokio::test]
async fn test_comments_flow() {
    let (server, _) = create_test_server(StubProvider::default()).await;

    server
        .post("/comments")
        .json(&json!({ "movie_id": 550, "comment": "first" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/comments")
        .json(&json!({ "movie_id": 550, "username": "ana", "comment": "second" }))
        .await
        .assert_status(StatusCode::CREATED);

    let comments: Vec<Value> = server.get("/comments/550").await.json();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["comment"], "second");
    assert_eq!(comments[0]["username"], "ana");
    assert_eq!(comments[1]["username"], "Demo User");

    let first_id = comments[1]["id"].as_i64().unwrap();
    server
        .delete(&format!("/comments/{}", first_id))
        .await
        .assert_status_ok();
    server
        .delete("/comments/9999")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let comments: Vec<Value> = server.get("/comments/550").await.json();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn test_recommendations_cold_start() {
    let popular: Vec<Value> = (1..=20).map(|id| movie(id, 7.0, 1000)).collect();
    let provider = StubProvider::default().with("/movie/popular", json!({ "results": popular }));
    let (server, _) = create_test_server(provider).await;

    let response = server.get("/recommendations").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "Rate or favorite movies to get personalized recommendations!"
    );
    assert_eq!(body["results"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_recommendations_from_liked_movies() {
    let similar: Vec<Value> = (100..120).map(|id| movie(id, 6.0 + (id - 100) as f64 * 0.1, 500)).collect();
    let provider = StubProvider::default()
        .with("/movie/550/similar", json!({ "results": similar }))
        .with("/movie/550", json!({ "id": 550, "genres": [] }));
    let (server, _) = create_test_server(provider).await;

    server.post("/favorites").json(&json!({ "movie_id": 550 })).await;
    // Low rating does not count as liked
    server
        .post("/ratings")
        .json(&json!({ "movie_id": 13, "rating": 2 }))
        .await;

    let response = server.get("/recommendations").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Based on 1 movies you liked!");

    // Ids 100..=104 sit below the 6.5 vote average bar
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 15);
    assert_eq!(results[0]["id"], 119);
    assert!(body.get("failed_lookups").is_none());
}

#[tokio::test]
async fn test_recommendations_report_failed_lookups() {
    let provider = StubProvider::default()
        .with("/movie/550/similar", json!({ "results": [movie(1, 8.0, 5000)] }));
    let (server, _) = create_test_server(provider).await;

    server.post("/favorites").json(&json!({ "movie_id": 550 })).await;
    server.post("/favorites").json(&json!({ "movie_id": 13 })).await;

    let response = server.get("/recommendations").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let failed = body["failed_lookups"].as_array().unwrap();
    let stages: Vec<(&str, i64)> = failed
        .iter()
        .map(|f| (f["stage"].as_str().unwrap(), f["id"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        stages,
        vec![("similar", 13), ("details", 550), ("details", 13)]
    );
}
