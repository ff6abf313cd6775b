//! Daily admin digest job.
//!
//! A background task that once a day queries customers with visits in the
//! next two days and emails the operator a summary. Upstream faults are
//! logged and the loop keeps running; only missing configuration disables
//! the job (at spawn time, never mid-flight).

use std::time::Duration;

use chrono::{Days, Local};
use tokio::task::JoinHandle;

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::state::AppState;

/// How far ahead the digest looks.
const DIGEST_WINDOW_DAYS: u64 = 2;

/// One tick per day; the first tick fires immediately on boot.
const DIGEST_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Spawn the digest loop if a recipient is configured.
///
/// Returns `None` when `DIGEST_RECIPIENT` is unset.
pub fn spawn(state: AppState) -> Option<JoinHandle<()>> {
    let recipient = state.config().digest()?.recipient.clone();
    tracing::info!(recipient = %recipient, "Digest job enabled");

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(DIGEST_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = run_once(&state, &recipient).await {
                tracing::error!(error = %e, "Digest run failed");
            }
        }
    }))
}

/// One digest pass: query the window, skip when empty, send the email.
async fn run_once(state: &AppState, recipient: &str) -> Result<(), AppError> {
    let today = Local::now().date_naive();
    let until = today
        .checked_add_days(Days::new(DIGEST_WINDOW_DAYS))
        .unwrap_or(today);

    let repo = CustomerRepository::new(state.pool());
    let upcoming = repo.upcoming(today, until).await?;

    if upcoming.is_empty() {
        tracing::debug!("No upcoming visits, skipping digest");
        return Ok(());
    }

    tracing::info!(visits = upcoming.len(), "Sending daily digest");
    state.email().send_digest(recipient, today, &upcoming).await?;
    Ok(())
}
