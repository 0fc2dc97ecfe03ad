//! Adapters to systems outside this service.

/// HTTP client for the content service's course read interface.
pub mod course_gateway;

pub use course_gateway::LmsCourseClient;
