//! Anthropic Messages API client for the daily agenda summary.

pub mod client;
pub mod error;
pub mod types;

pub use client::AgendaClient;
pub use error::AiError;
