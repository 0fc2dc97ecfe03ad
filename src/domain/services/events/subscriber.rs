//--------------------------------------------------------------------------------------------------
// STRUCTS & TRAITS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                                      | Key Methods       |
// |-----------------------|--------------------------------------------------|-------------------|
// | CourseEventHandler    | Reacts to one decoded course event               | handle, name      |
// | CourseEventSubscriber | Consumes the course queue and dispatches events  | subscribe         |
// | SubscriptionHandle    | Running receive + dispatch tasks                 | join              |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use async_trait::async_trait;
use rabbitmq::{Acknowledger, Delivery, RabbitMQTransport, Subscription};
use tokio::{select, sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::event_types::{DispatchStats, EventResult};
use crate::domain::models::CourseEvent;
use crate::inbounds::decode_course_event;

/// Default capacity of the buffer between the receive loop and the dispatch task
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Trait for components that react to course events.
///
/// Returning `Err` rejects the delivery; it is nacked without requeue and not retried.
#[async_trait]
pub trait CourseEventHandler: Send + Sync {
    /// Processes an event.
    ///
    /// # Arguments
    /// * `event` - The decoded event
    async fn handle(&self, event: &CourseEvent) -> EventResult<()>;

    /// Handler name used in logs
    fn name(&self) -> &'static str;
}

/// Recommendation-service side of the pipeline
///
/// ```text
/// broker --> Subscription::receive --(bounded mpsc)--> dispatch --> handler
///                                                          |
///                                                          +--> ack / nack(requeue = false)
/// ```
///
/// Deliveries are handled one at a time in queue order.
#[derive(Debug, Clone)]
pub struct CourseEventSubscriber {
    buffer_size: usize,
}

impl Default for CourseEventSubscriber {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl CourseEventSubscriber {
    /// Creates a subscriber whose receive loop may run `buffer_size` deliveries ahead of the
    /// handler.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Starts consuming the course queue and feeding `handler`.
    ///
    /// Returns `None` (after logging) when the transport has no established channel; the
    /// service keeps running without event processing.
    ///
    /// Cancelling `shutdown` stops reading new deliveries. The event being handled at that
    /// moment is completed and settled; buffered deliveries are left unacknowledged for the
    /// broker to redeliver once the channel closes.
    pub async fn subscribe(
        &self,
        transport: &RabbitMQTransport,
        handler: Arc<dyn CourseEventHandler>,
        shutdown: CancellationToken,
    ) -> Option<SubscriptionHandle> {
        let subscription = match transport.subscribe().await {
            Ok(subscription) => subscription,
            Err(err) => {
                warn!("Cannot subscribe to course events: {}", err);
                return None;
            }
        };

        info!(
            "Subscribed to {} on queue {} with handler {}",
            transport.settings().binding_key(),
            subscription.queue_name(),
            handler.name()
        );

        let (tx, rx) = mpsc::channel(self.buffer_size);
        let acker: Arc<dyn Acknowledger> = Arc::new(subscription.acknowledger());

        let receiver = tokio::spawn(receive_loop(subscription, tx, shutdown.clone()));
        let dispatcher = tokio::spawn(dispatch(rx, handler, acker, shutdown));

        Some(SubscriptionHandle {
            receiver,
            dispatcher,
        })
    }
}

/// The two tasks behind a running subscription
pub struct SubscriptionHandle {
    receiver: JoinHandle<()>,
    dispatcher: JoinHandle<DispatchStats>,
}

impl SubscriptionHandle {
    /// Waits for both tasks to stop and returns the settlement counters
    pub async fn join(self) -> DispatchStats {
        if let Err(err) = self.receiver.await {
            error!("course event receive task ended abnormally: {}", err);
        }
        match self.dispatcher.await {
            Ok(stats) => stats,
            Err(err) => {
                error!("course event dispatch task ended abnormally: {}", err);
                DispatchStats::default()
            }
        }
    }
}

async fn receive_loop(
    mut subscription: Subscription,
    tx: mpsc::Sender<Delivery>,
    shutdown: CancellationToken,
) {
    loop {
        select! {
            _ = shutdown.cancelled() => break,
            delivery = subscription.receive() => {
                let Some(delivery) = delivery else {
                    warn!("Course event consumer closed by broker");
                    break;
                };
                select! {
                    _ = shutdown.cancelled() => break,
                    sent = tx.send(delivery) => {
                        if sent.is_err() {
                            debug!("dispatch task gone, stopping receive loop");
                            break;
                        }
                    }
                }
            }
        }
    }

    subscription.cancel().await;
    debug!("course event receive loop stopped");
}

/// Drains `rx`, handing each delivery to `handler` and settling it through `acker`.
///
/// * decoded and handled: ack
/// * undecodable payload: nack without requeue, handler not invoked
/// * handler error: nack without requeue
///
/// Runs until `rx` is closed or `shutdown` is cancelled. Settlement failures are logged and
/// do not stop the loop.
pub async fn dispatch(
    mut rx: mpsc::Receiver<Delivery>,
    handler: Arc<dyn CourseEventHandler>,
    acker: Arc<dyn Acknowledger>,
    shutdown: CancellationToken,
) -> DispatchStats {
    let mut stats = DispatchStats::default();

    loop {
        let delivery = select! {
            biased;
            _ = shutdown.cancelled() => break,
            delivery = rx.recv() => match delivery {
                Some(delivery) => delivery,
                None => break,
            },
        };

        if process_delivery(&delivery, handler.as_ref(), acker.as_ref()).await {
            stats.acked += 1;
        } else {
            stats.rejected += 1;
        }
    }

    info!(
        "Course event dispatch stopped ({} acked, {} rejected)",
        stats.acked, stats.rejected
    );
    stats
}

/// Returns true when the delivery was acknowledged
async fn process_delivery(
    delivery: &Delivery,
    handler: &dyn CourseEventHandler,
    acker: &dyn Acknowledger,
) -> bool {
    let event = match decode_course_event(&delivery.content) {
        Ok(event) => event,
        Err(err) => {
            warn!(
                "Rejecting undecodable message {} on {}: {}",
                delivery.delivery_tag, delivery.routing_key, err
            );
            reject(delivery, acker).await;
            return false;
        }
    };

    debug!(
        "Received {} for course {} (redelivered: {})",
        event.event_type(),
        event.course_id(),
        delivery.redelivered
    );

    match handler.handle(&event).await {
        Ok(()) => {
            if let Err(err) = acker.ack(delivery.delivery_tag).await {
                error!("Failed to ack message {}: {}", delivery.delivery_tag, err);
            }
            true
        }
        Err(err) => {
            error!(
                "Handler {} failed for course {}: {}",
                handler.name(),
                event.course_id(),
                err
            );
            reject(delivery, acker).await;
            false
        }
    }
}

async fn reject(delivery: &Delivery, acker: &dyn Acknowledger) {
    if let Err(err) = acker.nack(delivery.delivery_tag, false).await {
        error!("Failed to nack message {}: {}", delivery.delivery_tag, err);
    }
}
