//! # General Route Handlers
//!
//! The root, health check and department directory endpoints.

use super::AppState;
use axum::{extract::State, Json};
use hrchat::Department;

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "hrchat server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Lists the departments questions can be handed off to.
pub async fn departments_handler(State(app_state): State<AppState>) -> Json<Vec<Department>> {
    Json(app_state.graph.departments().iter().cloned().collect())
}
