//! API Routes
//!
//! This module organizes the HTTP endpoints for the application:
//! - `/analyze` - Document upload and analysis
//! - `/health` - Health checks

pub mod analyze;
pub mod health;

use axum::Router;
use tracing::info;

use crate::middleware::cors;
use crate::models::AppState;

/// Create the main application router.
///
/// All routes accept cross-origin requests (the frontend runs on a
/// different origin) and request/response pairs are traced.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let router = Router::new()
        .merge(analyze::router(state.clone()))
        .merge(health::router(state))
        .layer(tower_http::trace::TraceLayer::new_for_http());

    cors::apply_cors(router)
}
