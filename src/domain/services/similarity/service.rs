use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use super::engine;
use crate::domain::models::{CourseId, CourseSnapshot, SimilarCoursesResponse};

/// Failures of the course read interface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The content service answered 404 for the course
    #[error("Course with ID {0} not found")]
    NotFound(CourseId),

    /// Transport failure or unexpected upstream status
    #[error("Content service request failed: {0}")]
    Upstream(String),

    /// The upstream body could not be decoded
    #[error("Content service returned an invalid payload: {0}")]
    Decode(String),
}

/// Read access to course records owned by the content service.
///
/// Implementations must be thread-safe; the similarity service calls them from concurrent
/// HTTP handlers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CourseReadGateway: Send + Sync {
    /// Fetches a single course.
    ///
    /// # Returns
    /// * `Ok(CourseSnapshot)` - The course as currently stored upstream
    /// * `Err(GatewayError::NotFound)` - If the content service does not know the id
    /// * `Err(GatewayError)` - Any other upstream failure
    async fn fetch_course(&self, id: &CourseId) -> Result<CourseSnapshot, GatewayError>;

    /// Fetches the full catalog.
    async fn fetch_all_courses(&self) -> Result<Vec<CourseSnapshot>, GatewayError>;
}

/// Answers "similar courses" queries from live content-service data
pub struct SimilarityService {
    gateway: Arc<dyn CourseReadGateway>,
}

impl SimilarityService {
    pub fn new(gateway: Arc<dyn CourseReadGateway>) -> Self {
        Self { gateway }
    }

    /// Finds the courses most similar to `course_id`.
    ///
    /// Fetches the target, then the catalog, then ranks. Any gateway error is returned as-is
    /// and ranking is skipped.
    pub async fn find_similar(
        &self,
        course_id: &CourseId,
    ) -> Result<SimilarCoursesResponse, GatewayError> {
        let target = self.gateway.fetch_course(course_id).await?;
        let catalog = self.gateway.fetch_all_courses().await?;
        debug!("ranking {} candidates for course {}", catalog.len(), course_id);

        let similar_courses = engine::rank(&target, catalog);
        info!(
            "Found {} similar courses for course {}",
            similar_courses.len(),
            course_id
        );

        Ok(SimilarCoursesResponse {
            course_id: course_id.clone(),
            similar_courses,
        })
    }
}
