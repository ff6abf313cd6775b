//! The customer record and its enums.
//!
//! `next_visit` is a [`chrono::NaiveDate`]: a calendar date with no
//! time-of-day and no time zone. Its `Ord` agrees with lexicographic
//! ordering of zero-padded `YYYY-MM-DD` strings, so every threshold
//! comparison the lifecycle engine makes is well defined regardless of
//! the host machine's time zone.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque unique customer identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The cadence governing automatic rescheduling of `next_visit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// One-off job; `next_visit` is never auto-advanced.
    #[default]
    None,
    /// Every 7 calendar days.
    Weekly,
    /// Every 14 calendar days.
    Biweekly,
    /// Every calendar month, clamped to the last valid day of shorter months.
    Monthly,
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Weekly => write!(f, "weekly"),
            Self::Biweekly => write!(f, "biweekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("invalid recurrence: {s}")),
        }
    }
}

/// Whether the current visit's work has been done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    Pending,
    Completed,
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid work status: {s}")),
        }
    }
}

/// Payment state for the current cycle.
///
/// `Overdue` only ever arises from `Pending` whose `next_visit` was
/// strictly in the past at the last reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Overdue => write!(f, "overdue"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// How the price on the record is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    #[default]
    Fixed,
    Hourly,
}

impl std::fmt::Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Hourly => write!(f, "hourly"),
        }
    }
}

impl std::str::FromStr for PriceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "hourly" => Ok(Self::Hourly),
            _ => Err(format!("invalid price type: {s}")),
        }
    }
}

/// A customer record - the sole entity of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned identifier, immutable.
    pub id: CustomerId,
    /// Display name, required and non-empty.
    pub name: String,
    /// Optional contact address for reminder emails.
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    /// Free-text preferred time of day ("9:00", "afternoon", ...).
    pub visit_time: Option<String>,
    /// Non-negative price, nullable.
    pub price: Option<Decimal>,
    pub price_type: PriceType,
    pub recurring: Recurrence,
    pub work_status: WorkStatus,
    pub payment_status: PaymentStatus,
    /// Next scheduled visit, a time-zone-less calendar date.
    pub next_visit: NaiveDate,
    /// Historically named; cleared on every advance, set by manual edits.
    pub last_payment: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input validation failures for customer creation and edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("price must not be negative")]
    NegativePrice,
}

/// Caller-supplied fields for creating or updating a customer.
///
/// The store assigns `id` and timestamps; everything else comes from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub visit_time: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub price_type: PriceType,
    #[serde(default)]
    pub recurring: Recurrence,
    #[serde(default)]
    pub work_status: WorkStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub next_visit: NaiveDate,
    #[serde(default)]
    pub last_payment: Option<NaiveDate>,
}

impl CustomerDraft {
    /// Check the draft's field-level invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: empty name or negative price.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(price) = self.price {
            if price.is_sign_negative() && !price.is_zero() {
                return Err(ValidationError::NegativePrice);
            }
        }
        Ok(())
    }
}
