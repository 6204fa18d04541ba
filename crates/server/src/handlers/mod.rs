//! # Route Handlers
//!
//! This module organizes the Axum handlers by concern and re-exports the
//! shared pieces handler files need.

pub mod chats;
pub mod general;
pub mod reference;
pub mod suggest;
pub mod webhook;

pub use chats::*;
pub use general::*;
pub use reference::*;
pub use suggest::*;
pub use webhook::*;

pub use crate::errors::AppError;
pub use crate::state::AppState;
pub use crate::types::ApiResponse;

use axum::Json;

/// Wraps a payload in the standard response envelope.
pub fn wrap_response<T>(result: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { result })
}
