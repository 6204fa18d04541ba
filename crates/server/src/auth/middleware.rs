//! # Authentication Middleware
//!
//! This module provides the Axum middleware for handling JWT-based
//! authentication. It defines an `AuthenticatedAccount` extractor that can
//! be used in handlers to ensure a valid account is present and to get its
//! identity.
//!
//! There is no guest fallback: a request without a valid bearer token is
//! rejected with `401 Unauthorized`.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use core_access::{get_or_create_account, Account};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, warn};

use crate::state::AppState;

/// Represents the claims we expect to find in the JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The subject of the token, which we use as the unique account identifier.
    pub sub: String,
    /// The expiration timestamp.
    pub exp: usize,
    /// The account's database ID (UUID). This is optional and mainly for testing.
    #[serde(default)]
    pub account_id: String,
}

/// An Axum extractor that provides the currently authenticated account.
///
/// 1.  **Valid Token Present**: Resolves to the authenticated account.
/// 2.  **No Token / Invalid / Expired Token**: Rejects the request with a
///     `401 Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

/// A custom rejection type for authentication failures.
///
/// This allows the `FromRequestParts` implementation to return a specific
/// HTTP status code and error message, which Axum then turns into a response.
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for AuthenticatedAccount {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract the token from the `Authorization: Bearer <token>` header.
        let bearer_header =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    warn!("Unexpected error during header extraction: {}", e);
                    AuthError(
                        StatusCode::BAD_REQUEST,
                        "Invalid Authorization header format.".to_string(),
                    )
                })?;

        let Some(TypedHeader(Authorization(bearer))) = bearer_header else {
            return Err(AuthError(
                StatusCode::UNAUTHORIZED,
                "Authentication required.".to_string(),
            ));
        };

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "a-secure-secret-key".to_string());

        let token_data = decode::<Claims>(
            bearer.token(),
            &DecodingKey::from_secret(jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!("JWT validation failed: {}", e);
            AuthError(
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token.".to_string(),
            )
        })?;

        // Manually verify the expiration to be absolutely sure. The
        // `jsonwebtoken` crate should handle this, but an explicit check
        // keeps the behavior independent of validation configuration.
        let current_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| {
                AuthError(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "System time is before UNIX EPOCH.".to_string(),
                )
            })?
            .as_secs();

        if token_data.claims.exp < current_timestamp as usize {
            warn!(
                "Token has expired. exp: {}, current: {}",
                token_data.claims.exp, current_timestamp
            );
            return Err(AuthError(
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token.".to_string(),
            ));
        }

        // If account_id is provided in the claim, construct the account
        // directly. This is primarily for testing scenarios to inject a
        // specific account.
        let account = if !token_data.claims.account_id.is_empty() {
            Ok(Account {
                id: token_data.claims.account_id,
                role: "user".to_string(),
                created_at: Utc::now(),
            })
        } else {
            get_or_create_account(&state.sqlite_provider.db, &token_data.claims.sub).await
        }
        .map_err(|e| {
            // This is an internal error because the DB should be available.
            error!("Failed to get or create account: {}", e);
            AuthError(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not retrieve account: {e}"),
            )
        })?;

        Ok(AuthenticatedAccount(account))
    }
}
