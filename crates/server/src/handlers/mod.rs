//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `hrchat-server`.
//! The handlers are split into logical sub-modules based on their functionality.

pub mod chat;
pub mod general;
pub mod ingest;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use chat::*;
pub use general::*;
pub use ingest::*;

use super::{
    errors::AppError,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{extract::Query, Json};
use serde_json::Value;

/// Wraps a successful result in the standard `ApiResponse` format, including
/// debug information only when `?debug=true` was requested.
pub(crate) fn wrap_response<T>(
    result: T,
    debug_params: Query<DebugParams>,
    debug_info: Option<Value>,
) -> Json<ApiResponse<T>> {
    let debug = if debug_params.debug.unwrap_or(false) {
        debug_info
    } else {
        None
    };
    Json(ApiResponse { debug, result })
}
