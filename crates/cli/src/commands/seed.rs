//! Seed the database with demo customers.
//!
//! Useful for local development: a fresh database gets a handful of
//! customers covering every recurrence and payment state, with visits
//! spread around today so the reconcile pass has something to do.

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;

use brisa_core::{PaymentStatus, PriceType, Recurrence, WorkStatus};

use super::{CommandError, database_url};

struct DemoCustomer {
    name: &'static str,
    email: Option<&'static str>,
    address: &'static str,
    visit_time: &'static str,
    price: Decimal,
    price_type: PriceType,
    recurring: Recurrence,
    payment_status: PaymentStatus,
    /// Offset of the next visit from today, in days.
    visit_offset: i64,
}

fn demo_customers() -> Vec<DemoCustomer> {
    vec![
        DemoCustomer {
            name: "Ana Torres",
            email: Some("ana@example.com"),
            address: "12 Oak St",
            visit_time: "9:00",
            price: Decimal::new(8_000, 2),
            price_type: PriceType::Fixed,
            recurring: Recurrence::Weekly,
            payment_status: PaymentStatus::Paid,
            visit_offset: 1,
        },
        DemoCustomer {
            name: "Miguel Herrera",
            email: Some("miguel@example.com"),
            address: "48 Birch Ave",
            visit_time: "13:30",
            price: Decimal::new(3_500, 2),
            price_type: PriceType::Hourly,
            recurring: Recurrence::Biweekly,
            payment_status: PaymentStatus::Pending,
            visit_offset: 0,
        },
        DemoCustomer {
            name: "Lucia Fernandez",
            email: None,
            address: "7 Maple Ct",
            visit_time: "10:00",
            price: Decimal::new(12_000, 2),
            price_type: PriceType::Fixed,
            recurring: Recurrence::Monthly,
            payment_status: PaymentStatus::Pending,
            // In the past, so the next list reconcile marks it overdue.
            visit_offset: -5,
        },
        DemoCustomer {
            name: "Robert Hale",
            email: Some("robert@example.com"),
            address: "230 Main St",
            visit_time: "15:00",
            price: Decimal::new(6_500, 2),
            price_type: PriceType::Fixed,
            recurring: Recurrence::None,
            payment_status: PaymentStatus::Overdue,
            visit_offset: 3,
        },
    ]
}

/// Insert demo customers, optionally clearing the table first.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an insert fails.
pub async fn run(clear: bool) -> Result<(), CommandError> {
    let database_url = database_url()?;
    let pool = PgPool::connect(&database_url).await?;

    if clear {
        let deleted = sqlx::query("DELETE FROM customer")
            .execute(&pool)
            .await?
            .rows_affected();
        tracing::info!(deleted, "Cleared existing customers");
    }

    let today = Local::now().date_naive();
    let customers = demo_customers();
    for demo in &customers {
        insert(&pool, demo, today).await?;
    }

    tracing::info!(count = customers.len(), "Seeded demo customers");
    Ok(())
}

async fn insert(pool: &PgPool, demo: &DemoCustomer, today: NaiveDate) -> Result<(), CommandError> {
    let next_visit = if demo.visit_offset >= 0 {
        today
            .checked_add_days(Days::new(demo.visit_offset.unsigned_abs()))
            .unwrap_or(today)
    } else {
        today
            .checked_sub_days(Days::new(demo.visit_offset.unsigned_abs()))
            .unwrap_or(today)
    };

    sqlx::query(
        "INSERT INTO customer \
         (name, email, address, visit_time, price, price_type, \
          recurring, work_status, payment_status, next_visit) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(demo.name)
    .bind(demo.email)
    .bind(demo.address)
    .bind(demo.visit_time)
    .bind(demo.price)
    .bind(demo.price_type.to_string())
    .bind(demo.recurring.to_string())
    .bind(WorkStatus::Pending.to_string())
    .bind(demo.payment_status.to_string())
    .bind(next_visit)
    .execute(pool)
    .await?;

    Ok(())
}
