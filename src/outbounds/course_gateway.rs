use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::models::{CourseId, CourseSnapshot};
use crate::domain::services::similarity::{CourseReadGateway, GatewayError};

/// HTTP client for the content service's course read interface
#[derive(Debug, Clone)]
pub struct LmsCourseClient {
    /// HTTP client
    client: Client,

    /// Base URL of the content service, without trailing slash
    base_url: String,
}

/// `GET /courses` answers either with a bare array or with the paginated envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Courses(Vec<CourseSnapshot>),
    Page { data: Vec<CourseSnapshot> },
}

impl CatalogPayload {
    fn into_courses(self) -> Vec<CourseSnapshot> {
        match self {
            CatalogPayload::Courses(courses) => courses,
            CatalogPayload::Page { data } => data,
        }
    }
}

impl LmsCourseClient {
    /// Creates a client with the given per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Upstream(format!("failed to build HTTP client: {}", err)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/courses/{id}` with the id percent-encoded as a single path segment
    fn course_url(&self, id: &CourseId) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            GatewayError::Upstream(format!("invalid base URL {}: {}", self.base_url, err))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::Upstream(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .push("courses")
            .push(id.as_str());

        Ok(url)
    }
}

#[async_trait]
impl CourseReadGateway for LmsCourseClient {
    async fn fetch_course(&self, id: &CourseId) -> Result<CourseSnapshot, GatewayError> {
        let url = self.course_url(id)?;
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::Upstream(err.to_string()))?;

        match resp.status() {
            StatusCode::OK => resp
                .json::<CourseSnapshot>()
                .await
                .map_err(|err| GatewayError::Decode(err.to_string())),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(id.clone())),
            status => {
                warn!("content service answered {} for course {}", status, id);
                Err(GatewayError::Upstream(format!(
                    "unexpected status {} fetching course {}",
                    status, id
                )))
            }
        }
    }

    async fn fetch_all_courses(&self) -> Result<Vec<CourseSnapshot>, GatewayError> {
        let url = format!("{}/courses", self.base_url);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| GatewayError::Upstream(err.to_string()))?;

        match resp.status() {
            StatusCode::OK => resp
                .json::<CatalogPayload>()
                .await
                .map(CatalogPayload::into_courses)
                .map_err(|err| GatewayError::Decode(err.to_string())),
            status => {
                warn!("content service answered {} for course catalog", status);
                Err(GatewayError::Upstream(format!(
                    "unexpected status {} fetching course catalog",
                    status
                )))
            }
        }
    }
}
