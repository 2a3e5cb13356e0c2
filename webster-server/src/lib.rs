//! # Webster Server Library
//!
//! Shared state, routing, and handler modules for the Webster backend.
//! This library is used by both the binary and integration tests.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use sqlx::PgPool;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod auth;
pub mod canvases;
pub mod config;
pub mod empresas;
pub mod error;
pub mod health;
pub mod marcas;
pub mod metrics;
pub mod produtos;
pub mod uploads;
pub mod validation;

pub use config::Config;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool.
    pub db: PgPool,
    /// Runtime configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Bundle a pool and configuration into shared state.
    pub fn new(db: PgPool, config: Arc<Config>) -> Self {
        Self { db, config }
    }
}

/// Build a CORS layer restricted to the configured origins.
fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

/// Assemble the API router.
///
/// The `/metrics` endpoint is wired separately in the binary because it
/// needs the Prometheus recorder handle.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Health check endpoints (orchestrator probes)
        .route("/health/live", axum::routing::get(health::liveness))
        .route("/health/ready", axum::routing::get(health::readiness))
        .route("/health", axum::routing::get(health::readiness)) // Backward compatible
        .nest("/auth", auth::router())
        .nest("/empresas", empresas::router())
        .nest("/marcas", marcas::router())
        .nest("/products", produtos::router())
        .nest("/canvas", canvases::router())
        .nest("/upload", uploads::router())
        // Uploaded assets
        .nest_service("/public", ServeDir::new(&state.config.public_dir))
        // Room for multipart framing on top of the file itself
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes + 64 * 1024))
        // Request ID for distributed tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // CORS restricted to the configured origins
        .layer(build_cors_layer(&state.config))
        // Structured request tracing with timing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
