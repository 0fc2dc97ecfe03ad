pub mod course;

pub use course::{
    CourseEvent, CourseEventData, CourseEventType, CourseId, CourseSnapshot,
    SimilarCoursesResponse, SimilarityResult,
};
