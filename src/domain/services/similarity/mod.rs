//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Content-similarity ranking for the recommendation service. The engine is a pure function of
// the target and the catalog; the service wires it to live content-service reads.
//
// | Component            | Description                                                |
// |----------------------|------------------------------------------------------------|
// | engine               | Bounded heuristic score and top-N ranking                  |
// | CourseReadGateway    | Port for reading courses from the content service          |
// | SimilarityService    | find_similar: fetch target + catalog, then rank            |
//--------------------------------------------------------------------------------------------------

pub mod engine;
mod service;

pub use engine::{rank, score};
pub use service::{CourseReadGateway, GatewayError, SimilarityService};

#[cfg(test)]
pub use service::MockCourseReadGateway;
