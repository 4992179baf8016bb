// File: rds-ops/src/web/server.rs
use crate::web::{handlers, AppState};
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(state: AppState) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let missing_key = state.config.api_key.is_none();
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    if missing_key {
        tracing::warn!("No API key configured, trigger routes will answer 401");
    }
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === TRIGGER ROUTES (bearer API key) ===
        .route("/api/schedule", post(handlers::trigger_schedule))
        .route(
            "/api/snapshot-report",
            post(handlers::trigger_snapshot_report),
        )
        // === CALENDAR ROUTES ===
        .route(
            "/api/holidays/{year}",
            get(handlers::get_holiday_calendar),
        )
        .route("/api/health", get(handlers::get_health))
        // Add middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
