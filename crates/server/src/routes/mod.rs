//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /healthz                  - Liveness check
//! GET  /healthz/ready            - Readiness check (DB ping)
//!
//! # Auth (single operator password)
//! POST /login                    - Start a session
//! POST /logout                   - End the session
//!
//! # Customers (session required)
//! GET    /customers              - List (reconciled on read)
//! POST   /customers              - Create
//! GET    /customers/{id}         - Detail
//! PUT    /customers/{id}         - Update
//! DELETE /customers/{id}         - Delete
//! POST   /customers/{id}/complete - Mark job done (advance)
//! POST   /customers/{id}/remind   - Send bilingual reminder email
//!
//! # Reports (session required)
//! GET  /agenda-summary           - AI-written daily agenda
//! POST /export/pdf               - Customer report PDF
//! ```

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod agenda;
pub mod auth;
pub mod customers;
pub mod export;

/// All application routes. Static assets and health checks are wired in
/// `main`; everything here goes through the session layer.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        // Customers
        .route(
            "/customers",
            get(customers::list).post(customers::create),
        )
        .route(
            "/customers/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/customers/{id}/complete", post(customers::complete))
        .route("/customers/{id}/remind", post(customers::remind))
        // Reports
        .route("/agenda-summary", get(agenda::summary))
        .route("/export/pdf", post(export::pdf))
}
