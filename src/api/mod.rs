//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the recommendation service's REST API using Axum.
//
// | Component      | Description                                                |
// |----------------|------------------------------------------------------------|
// | API            | Main API structure coordinating routes and services        |
// | Routes         | Handler functions for API endpoints                        |
// | States         | Shared application state                                   |
//
//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name           | Description                                       | Key Methods       |
// |----------------|---------------------------------------------------|-------------------|
// | AppState       | Shared application state                          | new               |
// | Api            | Main API structure                                | routes, serve     |
// | ApiError       | API error types                                   | from              |
//--------------------------------------------------------------------------------------------------

mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Extension, Router, http::Method, routing::get};
use parking_lot::RwLock;
use rabbitmq::ConnectionState;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::domain::services::events::SimilarityIndexInvalidator;
use crate::domain::services::similarity::{CourseReadGateway, SimilarityService};

pub use error::{ApiError, ApiResult};
pub use routes::HealthResponse;

/// Shared application state accessible by all handlers
pub struct AppState {
    /// Similarity queries against the content service
    pub similarity: SimilarityService,
    /// Stale-course index fed by the event subscriber
    pub invalidator: Arc<SimilarityIndexInvalidator>,
    broker_state: RwLock<ConnectionState>,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn CourseReadGateway>,
        invalidator: Arc<SimilarityIndexInvalidator>,
    ) -> Self {
        Self {
            similarity: SimilarityService::new(gateway),
            invalidator,
            broker_state: RwLock::new(ConnectionState::Disconnected),
        }
    }

    pub fn broker_state(&self) -> ConnectionState {
        *self.broker_state.read()
    }

    pub fn set_broker_state(&self, state: ConnectionState) {
        *self.broker_state.write() = state;
    }
}

/// Main API structure
pub struct Api {
    /// API address
    addr: SocketAddr,
    /// Shared application state
    state: Arc<AppState>,
}

impl Api {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self { addr, state }
    }

    /// Creates all routes for the API
    pub fn routes(&self) -> Router {
        router(self.state.clone())
    }

    /// Starts the API server and runs until `shutdown` is cancelled
    pub async fn serve(self, shutdown: CancellationToken) -> std::io::Result<()> {
        let app = self.routes();

        let listener = TcpListener::bind(self.addr).await?;
        info!("API listening on {}", self.addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
    }
}

/// Router with every endpoint and the given state attached
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/courses/:id/similar", get(routes::similar_courses))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
