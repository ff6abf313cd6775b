//! Session login and logout.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::auth::{clear_current_operator, set_current_operator};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Verify the operator password and start a session.
///
/// # Errors
///
/// 401 on a wrong password, 500 if the hash or session store misbehaves.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<StatusCode, AppError> {
    let hash = state.config().admin_password_hash.expose_secret();
    let valid = bcrypt::verify(&body.password, hash)
        .map_err(|e| AppError::Internal(format!("bcrypt failure: {e}")))?;

    if !valid {
        tracing::warn!("Failed login attempt");
        return Err(AppError::Unauthorized("wrong password".to_string()));
    }

    set_current_operator(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session store failure: {e}")))?;

    tracing::info!("Operator logged in");
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the session.
///
/// # Errors
///
/// 500 if the session store misbehaves.
pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_operator(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session store failure: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}
