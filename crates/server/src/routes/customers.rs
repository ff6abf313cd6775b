//! Customer CRUD and lifecycle endpoints.
//!
//! Every list read runs the reconcile pass with a single `today` computed
//! once for the whole batch, so one response is internally consistent.
//! Date policy: `today` comes from the local calendar
//! (`Local::now().date_naive()`), matching the time-zone-less dates the
//! engine works with; UTC-anchored arithmetic is deliberately avoided.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;
use tracing::instrument;
use uuid::Uuid;

use brisa_core::{Customer, CustomerDraft, CustomerId, lifecycle};

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;

/// List all customers, reconciling each record on the way out.
///
/// Changed records are written back one by one; a failed write is logged
/// and the reconciled value is still returned. The next read repairs any
/// record whose write was lost, so the pass is self-healing.
#[instrument(skip_all)]
pub async fn list(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let repo = CustomerRepository::new(state.pool());
    let today = Local::now().date_naive();

    let mut customers = repo.list_all().await?;
    for customer in &mut customers {
        if let Some(updated) = lifecycle::reconcile(customer, today) {
            if let Err(e) = repo.save(&updated).await {
                tracing::warn!(customer_id = %updated.id, error = %e, "Reconcile write failed");
            }
            *customer = updated;
        }
    }

    Ok(Json(customers))
}

/// Create a customer from a validated draft.
pub async fn create(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Json(draft): Json<CustomerDraft>,
) -> Result<impl IntoResponse, AppError> {
    draft.validate()?;

    let repo = CustomerRepository::new(state.pool());
    let customer = repo.insert(&draft).await?;
    tracing::info!(customer_id = %customer.id, "Customer created");

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Fetch a single customer.
pub async fn show(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    let repo = CustomerRepository::new(state.pool());
    let customer = repo
        .find_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    Ok(Json(customer))
}

/// Replace a customer's editable fields.
pub async fn update(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CustomerDraft>,
) -> Result<Json<Customer>, AppError> {
    draft.validate()?;

    let repo = CustomerRepository::new(state.pool());
    let customer = repo
        .update(CustomerId::new(id), &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    Ok(Json(customer))
}

/// Delete a customer. No cascading effects; single-entity model.
pub async fn delete(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let repo = CustomerRepository::new(state.pool());
    let found = repo.delete(CustomerId::new(id)).await?;
    if !found {
        return Err(AppError::NotFound(format!("customer {id}")));
    }
    tracing::info!(customer_id = %id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Mark the current job complete and advance the schedule.
///
/// Plain read-modify-write with no version check: two simultaneous
/// completions can double-advance the schedule. Known limitation, kept.
#[instrument(skip(state), fields(customer_id = %id))]
pub async fn complete(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    let repo = CustomerRepository::new(state.pool());
    let today = Local::now().date_naive();

    let customer = repo
        .find_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    let updated = lifecycle::advance(&customer, today);
    repo.save(&updated).await?;

    tracing::info!(next_visit = %updated.next_visit, "Job completed");
    Ok(Json(updated))
}

/// Email the customer a bilingual visit reminder.
#[instrument(skip(state), fields(customer_id = %id))]
pub async fn remind(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let repo = CustomerRepository::new(state.pool());
    let customer = repo
        .find_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    if customer.email.is_none() {
        return Err(AppError::BadRequest(
            "customer has no email address".to_string(),
        ));
    }

    state.email().send_reminder(&customer).await?;
    Ok(StatusCode::NO_CONTENT)
}
