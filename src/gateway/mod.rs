pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::GatewayConfig;
use crate::session::session_middleware;
use state::AppState;

/// Build the full router
///
/// Everything under `/api/v1/private` requires a session token.
pub fn build_router(state: Arc<AppState>) -> Router {
    let private_routes = Router::new()
        .route(
            "/transfer",
            post(handlers::create_transfer).get(handlers::list_transfers),
        )
        .route("/transfer/{id}", get(handlers::get_transfer))
        .route(
            "/wallet",
            post(handlers::create_wallet).get(handlers::get_wallet),
        )
        .layer(from_fn_with_state(state.clone(), session_middleware));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/private", private_routes)
        .with_state(state)
}

/// Start HTTP Gateway server
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(addr = %addr, "Gateway listening");
    info!("Private API: /api/v1/private/* (session token required)");

    axum::serve(listener, app).await
}
