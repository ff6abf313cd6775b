//! AI-written daily agenda summary.

use axum::{Json, extract::State};
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use tracing::instrument;

use brisa_core::Customer;

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;

/// How far ahead the agenda looks, matching the digest job.
const AGENDA_WINDOW_DAYS: u64 = 2;

/// Agenda summary response.
#[derive(Debug, Serialize)]
pub struct AgendaSummary {
    pub date: NaiveDate,
    pub visits: usize,
    pub summary: String,
}

/// Summarize the next two days of visits.
///
/// 503 when no Anthropic key is configured, 502 when the API call fails.
#[instrument(skip_all)]
pub async fn summary(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<AgendaSummary>, AppError> {
    let client = state.agenda().ok_or_else(|| {
        AppError::Unavailable("agenda summary is not configured".to_string())
    })?;

    let today = Local::now().date_naive();
    let until = today
        .checked_add_days(Days::new(AGENDA_WINDOW_DAYS))
        .unwrap_or(today);

    let repo = CustomerRepository::new(state.pool());
    let upcoming = repo.upcoming(today, until).await?;

    if upcoming.is_empty() {
        return Ok(Json(AgendaSummary {
            date: today,
            visits: 0,
            summary: "No visits scheduled for the next two days.".to_string(),
        }));
    }

    let listing = format_listing(today, &upcoming);
    let summary = client.summarize(&listing).await?;

    Ok(Json(AgendaSummary {
        date: today,
        visits: upcoming.len(),
        summary,
    }))
}

/// Plain-text listing handed to the model.
fn format_listing(today: NaiveDate, customers: &[Customer]) -> String {
    let mut out = format!("Today is {today}. Upcoming visits:\n");
    for c in customers {
        out.push_str(&format!(
            "- {} on {} ({}, work {}, payment {})",
            c.name, c.next_visit, c.recurring, c.work_status, c.payment_status
        ));
        if let Some(time) = &c.visit_time {
            out.push_str(&format!(" at {time}"));
        }
        if let Some(address) = &c.address {
            out.push_str(&format!(", {address}"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use brisa_core::{CustomerId, PaymentStatus, PriceType, Recurrence, WorkStatus};

    #[test]
    fn test_format_listing_includes_every_customer() {
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(Uuid::new_v4()),
            name: "Ana Torres".to_string(),
            email: None,
            address: Some("12 Oak St".to_string()),
            notes: None,
            visit_time: Some("9:00".to_string()),
            price: None,
            price_type: PriceType::Fixed,
            recurring: Recurrence::Weekly,
            work_status: WorkStatus::Pending,
            payment_status: PaymentStatus::Pending,
            next_visit: NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"),
            last_payment: None,
            created_at: now,
            updated_at: now,
        };

        let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let listing = format_listing(today, std::slice::from_ref(&customer));
        assert!(listing.contains("Today is 2025-06-01"));
        assert!(listing.contains("Ana Torres"));
        assert!(listing.contains("2025-06-02"));
        assert!(listing.contains("at 9:00"));
        assert!(listing.contains("12 Oak St"));
    }
}
