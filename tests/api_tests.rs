//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module contains integration tests for the API.
// It drives the router with an in-memory content service and verifies the responses.
//--------------------------------------------------------------------------------------------------

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use hyper::Response;
use serde_json::{Value, from_slice};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use course_sync::{
    AppState, CourseEvent, CourseEventData, CourseEventType, CourseId, CourseReadGateway,
    CourseSnapshot, GatewayError, SimilarityIndexInvalidator, api::router,
};
use rabbitmq::ConnectionState;

/// Content service double serving a fixed catalog
struct StubGateway {
    courses: HashMap<CourseId, CourseSnapshot>,
    catalog: Vec<CourseSnapshot>,
    fail_catalog: bool,
}

impl StubGateway {
    fn with_catalog(catalog: Vec<CourseSnapshot>) -> Self {
        Self {
            courses: catalog.iter().map(|c| (c.id.clone(), c.clone())).collect(),
            catalog,
            fail_catalog: false,
        }
    }
}

#[async_trait]
impl CourseReadGateway for StubGateway {
    async fn fetch_course(&self, id: &CourseId) -> Result<CourseSnapshot, GatewayError> {
        self.courses
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn fetch_all_courses(&self) -> Result<Vec<CourseSnapshot>, GatewayError> {
        if self.fail_catalog {
            return Err(GatewayError::Upstream("connection refused".to_string()));
        }
        Ok(self.catalog.clone())
    }
}

fn sample_catalog() -> Vec<CourseSnapshot> {
    vec![
        CourseSnapshot::new("rust-101", "Rust 101")
            .with_category("programming")
            .with_tags(["rust", "systems"])
            .with_description("Learn Rust"),
        CourseSnapshot::new("rust-web", "Rust for the web")
            .with_category("programming")
            .with_tags(["rust", "web"])
            .with_description("rust for the web"),
        CourseSnapshot::new("go-101", "Go 101")
            .with_category("programming")
            .with_tags(["go"]),
        CourseSnapshot::new("watercolor", "Watercolor")
            .with_category("art")
            .with_tags(["painting"]),
    ]
}

/// Sets up a test router over the given gateway.
/// Returns the router and the shared state.
fn setup_test_router(gateway: StubGateway) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        Arc::new(gateway),
        Arc::new(SimilarityIndexInvalidator::new()),
    ));
    (router(state.clone()), state)
}

/// Helper to parse JSON responses
async fn parse_json_response(response: Response<Body>) -> Value {
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024) // 1MB limit
        .await
        .unwrap();

    from_slice(&body_bytes).unwrap()
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, state) = setup_test_router(StubGateway::with_catalog(sample_catalog()));
    state.invalidator.invalidate(&CourseEvent::new(
        CourseEventType::Updated,
        CourseId::from("rust-101"),
        CourseEventData::new("Rust 101"),
    ));

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["broker"], "disconnected");
    assert_eq!(body["staleCourses"], 1);
}

#[tokio::test]
async fn test_health_reports_broker_state() {
    let (app, state) = setup_test_router(StubGateway::with_catalog(sample_catalog()));
    state.set_broker_state(ConnectionState::Connected);

    let body = parse_json_response(get(app, "/health").await).await;

    assert_eq!(body["broker"], "connected");
}

#[tokio::test]
async fn test_similar_courses() {
    let (app, _) = setup_test_router(StubGateway::with_catalog(sample_catalog()));

    let response = get(app, "/courses/rust-101/similar").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    assert_eq!(body["courseId"], "rust-101");

    let similar = body["similarCourses"].as_array().unwrap();
    assert_eq!(similar.len(), 2);
    assert_eq!(similar[0]["id"], "rust-web");
    assert_eq!(similar[0]["similarityScore"], 62);
    assert_eq!(similar[0]["tags"], serde_json::json!(["rust", "web"]));
    assert_eq!(similar[1]["id"], "go-101");
    assert_eq!(similar[1]["similarityScore"], 50);
}

#[tokio::test]
async fn test_similar_courses_clears_stale_entries() {
    let (app, state) = setup_test_router(StubGateway::with_catalog(sample_catalog()));
    state.invalidator.invalidate(&CourseEvent::at(
        CourseEventType::Updated,
        CourseId::from("rust-web"),
        CourseEventData::new("Rust for the web"),
        Utc::now() - Duration::seconds(5),
    ));

    let response = get(app.clone(), "/courses/rust-101/similar").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_json_response(get(app, "/health").await).await;
    assert_eq!(body["staleCourses"], 0);
}

#[tokio::test]
async fn test_failed_lookup_keeps_stale_entries() {
    let mut gateway = StubGateway::with_catalog(sample_catalog());
    gateway.fail_catalog = true;
    let (app, state) = setup_test_router(gateway);
    state.invalidator.invalidate(&CourseEvent::at(
        CourseEventType::Updated,
        CourseId::from("rust-web"),
        CourseEventData::new("Rust for the web"),
        Utc::now() - Duration::seconds(5),
    ));

    let response = get(app, "/courses/rust-101/similar").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(state.invalidator.stale_count(), 1);
}

#[tokio::test]
async fn test_similar_courses_unknown_course() {
    let (app, _) = setup_test_router(StubGateway::with_catalog(sample_catalog()));

    let response = get(app, "/courses/missing/similar").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_json_response(response).await;
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["message"], "Course with ID missing not found");
}

#[tokio::test]
async fn test_similar_courses_upstream_failure() {
    let mut gateway = StubGateway::with_catalog(sample_catalog());
    gateway.fail_catalog = true;
    let (app, _) = setup_test_router(gateway);

    let response = get(app, "/courses/rust-101/similar").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = parse_json_response(response).await;
    assert_eq!(body["error"]["code"], 502);
}

#[tokio::test]
async fn test_similar_courses_with_no_matches() {
    let (app, _) = setup_test_router(StubGateway::with_catalog(vec![
        CourseSnapshot::new("only", "Only course").with_category("art"),
    ]));

    let response = get(app, "/courses/only/similar").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    assert_eq!(body["similarCourses"], serde_json::json!([]));
}
