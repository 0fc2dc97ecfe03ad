use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use course_sync::{
    Api, AppState, Config, CourseEventSubscriber, LmsCourseClient, SimilarityIndexInvalidator,
    config::{COURSE_BINDING_KEY, COURSE_EVENTS_QUEUE, EVENTS_EXCHANGE},
};
use rabbitmq::{RabbitMQTransport, TransportSettings};
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = Config::try_from_env().context("invalid configuration")?;

    let gateway = LmsCourseClient::new(&config.lms_api_url, config.gateway_timeout)
        .context("failed to build content service client")?;
    let invalidator = Arc::new(SimilarityIndexInvalidator::new());
    let state = Arc::new(AppState::new(Arc::new(gateway), invalidator.clone()));

    let settings = TransportSettings::new(
        &config.rabbit_url,
        &config.app_id,
        EVENTS_EXCHANGE,
        COURSE_EVENTS_QUEUE,
        COURSE_BINDING_KEY,
    )
    .with_connect_timeout(config.broker_connect_timeout)
    .with_prefetch_count(config.broker_prefetch_count);
    let mut transport = RabbitMQTransport::new(settings);

    // A broker outage only disables event processing; similarity queries keep working
    if transport.open().await.is_err() {
        warn!("Starting without course event processing");
    }
    state.set_broker_state(transport.state());

    let shutdown = CancellationToken::new();
    let subscription = CourseEventSubscriber::new(config.event_buffer_size)
        .subscribe(&transport, invalidator, shutdown.child_token())
        .await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let api = Api::new(addr, state.clone());
    let server = tokio::spawn(api.serve(shutdown.child_token()));

    info!("Similar courses service running on port {}", config.http_port);

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
    }
    info!("Shutting down");
    shutdown.cancel();

    if let Some(subscription) = subscription {
        let stats = subscription.join().await;
        info!(
            "Course events processed: {} acked, {} rejected",
            stats.acked, stats.rejected
        );
    }

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!("API server error: {}", err),
        Err(err) => error!("API server task failed: {}", err),
    }

    transport.close().await;
    state.set_broker_state(transport.state());

    Ok(())
}
