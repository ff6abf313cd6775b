//! Brisa Core - Domain types and the customer lifecycle engine.
//!
//! This crate provides the pieces shared across all Brisa components:
//! - `server` - HTTP surface, persistence and outbound services
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. The lifecycle engine in particular
//! takes "today" as an explicit argument instead of reading the clock,
//! which keeps every transition independently testable.
//!
//! # Modules
//!
//! - [`customer`] - The customer record and its status/recurrence enums
//! - [`lifecycle`] - `reconcile` and `advance`, the two lifecycle transitions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod customer;
pub mod lifecycle;

pub use customer::{
    Customer, CustomerDraft, CustomerId, PaymentStatus, PriceType, Recurrence, ValidationError,
    WorkStatus,
};
pub use lifecycle::{add_interval, advance, reconcile};
