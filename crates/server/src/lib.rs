//! Brisa server library.
//!
//! This crate provides the back-office server as a library, allowing it
//! to be tested and reused from the CLI and integration tests.
//!
//! # Architecture
//!
//! - Axum web framework with session-cookie auth
//! - `PostgreSQL` customer store via sqlx
//! - Askama templates for bilingual reminder emails
//! - Anthropic Messages API for the daily agenda summary
//! - printpdf for customer report export

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
