//! Outbound services for the back office.
//!
//! # Services
//!
//! - `email` - Bilingual reminder and digest delivery via SMTP
//! - `digest` - Daily background job emailing upcoming visits
//! - `report` - PDF customer report rendering

pub mod digest;
pub mod email;
pub mod report;

pub use email::{EmailError, EmailService};
pub use report::{ReportError, customer_report};
