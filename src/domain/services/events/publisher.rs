//--------------------------------------------------------------------------------------------------
// STRUCTS & TRAITS
//--------------------------------------------------------------------------------------------------
// | Name                 | Description                                       | Key Methods       |
// |----------------------|---------------------------------------------------|-------------------|
// | EventSink            | Destination for encoded events                    | send              |
// | CourseEventPublisher | Turns course mutations into broker messages       | publish           |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use rabbitmq::{Message, Publisher, PublisherContext, RabbitMQTransport};
use tracing::{debug, error, warn};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::event_types::{EventError, EventResult};
use crate::domain::models::{CourseEvent, CourseEventData, CourseEventType, CourseId};

/// Destination for encoded course events.
///
/// The broker [`Publisher`] is the production implementation.
#[cfg_attr(test, automock)]
pub trait EventSink: Send + Sync {
    /// Hands one encoded message to the transport.
    ///
    /// # Arguments
    /// * `routing_key` - Topic the message is routed on
    /// * `payload` - UTF-8 JSON body
    /// * `message_id` - Unique id stamped on the message
    fn send(&self, routing_key: &str, payload: Vec<u8>, message_id: &str) -> EventResult<()>;
}

impl EventSink for Publisher {
    fn send(&self, routing_key: &str, payload: Vec<u8>, message_id: &str) -> EventResult<()> {
        let ctx = PublisherContext::new(&Uuid::new_v4().to_string(), Some(message_id.to_owned()));
        let message = Message::new(payload, Some(routing_key.to_owned()));
        self.publish(message, ctx)?;
        Ok(())
    }
}

/// Content-service side of the pipeline.
///
/// Publishing is fire-and-forget: no method here returns an error or panics, so a broker
/// outage never blocks or rolls back the course mutation that triggered the event.
#[derive(Clone)]
pub struct CourseEventPublisher {
    sink: Option<Arc<dyn EventSink>>,
}

impl CourseEventPublisher {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Publisher with no transport; every publish is a logged no-op
    pub fn disconnected() -> Self {
        Self { sink: None }
    }

    /// Builds a publisher on top of an opened transport, or a disconnected one if the
    /// transport is not connected.
    pub fn from_transport(transport: &mut RabbitMQTransport) -> Self {
        match transport.publisher() {
            Some(publisher) => Self::new(Arc::new(publisher)),
            None => Self::disconnected(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.sink.is_some()
    }

    /// Emits one course event stamped with the current time.
    pub fn publish(&self, event_type: CourseEventType, course_id: CourseId, data: CourseEventData) {
        self.publish_event(&CourseEvent::new(event_type, course_id, data));
    }

    pub fn publish_course_created(&self, course_id: CourseId, data: CourseEventData) {
        self.publish(CourseEventType::Created, course_id, data);
    }

    pub fn publish_course_updated(&self, course_id: CourseId, data: CourseEventData) {
        self.publish(CourseEventType::Updated, course_id, data);
    }

    /// Emits an already built event.
    pub fn publish_event(&self, event: &CourseEvent) {
        let Some(sink) = &self.sink else {
            warn!(
                "Message broker not connected, skipping {} for course {}",
                event.event_type(),
                event.course_id()
            );
            return;
        };

        match encode(event).and_then(|payload| {
            sink.send(event.routing_key(), payload, &Uuid::new_v4().to_string())
        }) {
            Ok(()) => debug!("Published {} for course {}", event.event_type(), event.course_id()),
            Err(err) => error!(
                "Failed to publish {} for course {}: {}",
                event.event_type(),
                event.course_id(),
                err
            ),
        }
    }
}

fn encode(event: &CourseEvent) -> EventResult<Vec<u8>> {
    serde_json::to_vec(event).map_err(|err| EventError::Serialization(err.to_string()))
}
