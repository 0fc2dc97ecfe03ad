//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the course event pipeline between the content service and the
// recommendation service. Publishing never blocks the mutation that triggered it; consuming
// settles every delivery exactly once (ack on success, nack without requeue otherwise).
//
// | Component                   | Description                                               |
// |-----------------------------|-----------------------------------------------------------|
// | CourseEventPublisher        | Encodes course mutations and hands them to the broker     |
// | EventSink                   | Seam between the publisher and the transport              |
// | CourseEventSubscriber       | Receive loop + bounded buffer + single dispatch task      |
// | CourseEventHandler          | Trait for components that react to course events          |
// | SimilarityIndexInvalidator  | Handler recording the latest change per course            |
//--------------------------------------------------------------------------------------------------

mod event_types;
mod invalidator;
mod publisher;
mod subscriber;

#[cfg(test)]
mod tests;

// Re-exports
pub use event_types::{DispatchStats, EventError, EventResult};
pub use invalidator::SimilarityIndexInvalidator;
pub use publisher::{CourseEventPublisher, EventSink};
pub use subscriber::{
    CourseEventHandler, CourseEventSubscriber, DEFAULT_BUFFER_SIZE, SubscriptionHandle, dispatch,
};
