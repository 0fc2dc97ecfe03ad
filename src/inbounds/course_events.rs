//! Decoding of broker deliveries into domain events.

use crate::domain::models::CourseEvent;
use crate::domain::services::events::{EventError, EventResult};

/// Decodes a delivery body into a [`CourseEvent`].
///
/// # Arguments
///
/// * `content` - Raw delivery body, expected to be UTF-8 JSON
///
/// # Errors
///
/// Returns `EventError::Decode` for non-UTF-8 bodies, malformed JSON, missing fields or an
/// unknown event type.
pub fn decode_course_event(content: &[u8]) -> EventResult<CourseEvent> {
    let text = std::str::from_utf8(content).map_err(|err| EventError::Decode(err.to_string()))?;
    serde_json::from_str(text).map_err(|err| EventError::Decode(err.to_string()))
}
