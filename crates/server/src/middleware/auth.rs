//! Authentication extractors.
//!
//! The back office is single-operator: a successful password login stores
//! a [`CurrentOperator`] marker in the session, and every protected route
//! requires it through the [`RequireAuth`] extractor.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the logged-in operator.
    pub const CURRENT_OPERATOR: &str = "current_operator";
}

/// Session-stored operator identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOperator {
    /// When this session was authenticated.
    pub signed_in_at: DateTime<Utc>,
}

/// Extractor that requires an authenticated session.
///
/// The whole surface is a JSON API consumed by the bundled front end, so
/// an unauthenticated request always gets 401 rather than a redirect.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(operator): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("signed in at {}", operator.signed_in_at)
/// }
/// ```
pub struct RequireAuth(pub CurrentOperator);

/// Error returned when authentication is required but missing.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let operator: CurrentOperator = session
            .get(session_keys::CURRENT_OPERATOR)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(operator))
    }
}

/// Helper to set the current operator in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_operator(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    let operator = CurrentOperator {
        signed_in_at: Utc::now(),
    };
    session
        .insert(session_keys::CURRENT_OPERATOR, &operator)
        .await
}

/// Helper to clear the current operator from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_operator(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentOperator>(session_keys::CURRENT_OPERATOR)
        .await?;
    Ok(())
}
