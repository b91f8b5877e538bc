//! JSON API consumed by the booking page.

mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/price_estimate", post(handlers::price_estimate))
        .route("/api/distance", post(handlers::distance))
        .route("/api/nearby_drivers", post(handlers::nearby_drivers))
        .route("/api/match_driver", post(handlers::match_driver))
        .route("/api/update_location", post(handlers::update_location))
        .route("/api/availability", post(handlers::set_availability))
        .route("/api/autocomplete", get(handlers::autocomplete))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub async fn start(host: &str, port: u16, state: AppState) -> Result<(), ServerError> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
