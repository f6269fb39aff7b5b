//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage, event bus and confirmation listener wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use orderdesk_infra::{AppConfig, Mailer};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Spawns the confirmation listener, so it must run inside a Tokio runtime.
pub async fn build_app(
    config: &AppConfig,
    mailer: Arc<dyn Mailer>,
) -> Result<Router, services::ServicesError> {
    let services = Arc::new(services::build_services(config, mailer).await?);
    Ok(router(services))
}

/// Router over already-built services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_context_middleware))
                .layer(Extension(services)),
        )
}
