//! PDF report export.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::Local;
use tracing::instrument;

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::services::report;
use crate::state::AppState;

/// Render and download the full customer report.
#[instrument(skip_all)]
pub async fn pdf(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CustomerRepository::new(state.pool());
    let customers = repo.list_all().await?;
    let today = Local::now().date_naive();

    let bytes = report::customer_report(&customers, today)?;
    tracing::info!(customers = customers.len(), bytes = bytes.len(), "Report exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"customers-{today}.pdf\""),
            ),
        ],
        bytes,
    ))
}
