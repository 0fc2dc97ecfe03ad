//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                                | Return Type                 |
// |-----------------------|--------------------------------------------|-----------------------------|
// | health                | Liveness plus event pipeline status        | Json<HealthResponse>        |
// | similar_courses       | Top similar courses for a course           | ApiResult<Json<...>>        |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
};
use chrono::Utc;
use serde::Serialize;

use super::{ApiResult, AppState};
use crate::domain::models::{CourseId, SimilarCoursesResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub broker: String,
    pub stale_courses: usize,
}

/// Health check endpoint
///
/// Always answers "ok"; a disconnected broker only degrades event processing.
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        broker: state.broker_state().to_string(),
        stale_courses: state.invalidator.stale_count(),
    })
}

/// Similar courses for `id`, computed from live content-service data
///
/// A successful answer read the whole catalog, so changes recorded before the read are cleared.
pub async fn similar_courses(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SimilarCoursesResponse>> {
    let read_started = Utc::now();
    let response = state.similarity.find_similar(&CourseId::new(id)).await?;
    state.invalidator.clear_through(read_started);
    Ok(Json(response))
}
