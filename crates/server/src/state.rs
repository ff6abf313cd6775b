//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::ai::AgendaClient;
use crate::config::AppConfig;
use crate::services::email::EmailService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    email: EmailService,
    agenda: Option<AgendaClient>,
}

impl AppState {
    /// Build the shared state from configuration and a connected pool.
    ///
    /// The agenda client is only constructed when an Anthropic key is
    /// configured; the summary endpoint reports itself unavailable otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be constructed.
    pub fn new(
        config: AppConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let email = EmailService::new(&config.email)?;
        let agenda = config.ai().map(AgendaClient::new);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                agenda,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    #[must_use]
    pub fn agenda(&self) -> Option<&AgendaClient> {
        self.inner.agenda.as_ref()
    }
}
