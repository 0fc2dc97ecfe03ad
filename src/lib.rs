// Expose the modules
pub mod api;
pub mod config;
pub mod domain;
pub mod inbounds;
pub mod outbounds;

// Re-export key types for easier usage
pub use api::{Api, AppState};
pub use config::Config;
pub use domain::models::{
    CourseEvent, CourseEventData, CourseEventType, CourseId, CourseSnapshot,
    SimilarCoursesResponse, SimilarityResult,
};
pub use domain::services::events::{
    CourseEventHandler, CourseEventPublisher, CourseEventSubscriber, EventError, EventResult,
    SimilarityIndexInvalidator,
};
pub use domain::services::similarity::{
    CourseReadGateway, GatewayError, SimilarityService, rank, score,
};
pub use outbounds::LmsCourseClient;
