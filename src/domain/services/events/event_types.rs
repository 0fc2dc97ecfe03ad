//--------------------------------------------------------------------------------------------------
// ENUMS & TYPES
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                        | Key Methods         |
// |-----------------|----------------------------------------------------|---------------------|
// | EventError      | Failures while publishing, decoding or handling    | handler             |
// | EventResult     | Result alias for event operations                  |                     |
// | DispatchStats   | Settlement counters of a subscription              | total               |
//--------------------------------------------------------------------------------------------------

use thiserror::Error;

/// Errors that can occur in the course event pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Event could not be encoded as JSON
    #[error("Failed to serialize event: {0}")]
    Serialization(String),

    /// Delivery body is not a valid course event
    #[error("Failed to decode event payload: {0}")]
    Decode(String),

    /// A handler reported failure
    #[error("Event handler {handler} failed: {reason}")]
    Handler { handler: String, reason: String },

    /// The transport refused the message
    #[error("Broker error: {0}")]
    Broker(String),
}

impl EventError {
    pub fn handler(handler: &str, reason: impl Into<String>) -> Self {
        Self::Handler {
            handler: handler.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<rabbitmq::RabbitMQError> for EventError {
    fn from(err: rabbitmq::RabbitMQError) -> Self {
        Self::Broker(err.to_string())
    }
}

/// Result type for event operations
pub type EventResult<T> = Result<T, EventError>;

/// How many deliveries a subscription acknowledged and rejected before it stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub acked: u64,
    pub rejected: u64,
}

impl DispatchStats {
    pub fn total(&self) -> u64 {
        self.acked + self.rejected
    }
}
