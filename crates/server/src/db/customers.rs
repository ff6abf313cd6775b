//! Customer repository for database operations.
//!
//! Rows keep the status enums as TEXT; the conversion into domain types
//! happens in `TryFrom`, so a bad value in the database surfaces as
//! `RepositoryError::DataCorruption` instead of a panic.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use brisa_core::{Customer, CustomerDraft, CustomerId};

use super::RepositoryError;

const CUSTOMER_COLUMNS: &str = "id, name, email, address, notes, visit_time, price, price_type, \
     recurring, work_status, payment_status, next_visit, last_payment, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    visit_time: Option<String>,
    price: Option<Decimal>,
    price_type: String,
    recurring: String,
    work_status: String,
    payment_status: String,
    next_visit: NaiveDate,
    last_payment: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let corrupt =
            |field: &str, value: &str| RepositoryError::DataCorruption(format!("{field}: {value}"));

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            email: row.email,
            address: row.address,
            notes: row.notes,
            visit_time: row.visit_time,
            price: row.price,
            price_type: row
                .price_type
                .parse()
                .map_err(|_| corrupt("price_type", &row.price_type))?,
            recurring: row
                .recurring
                .parse()
                .map_err(|_| corrupt("recurring", &row.recurring))?,
            work_status: row
                .work_status
                .parse()
                .map_err(|_| corrupt("work_status", &row.work_status))?,
            payment_status: row
                .payment_status
                .parse()
                .map_err(|_| corrupt("payment_status", &row.payment_status))?,
            next_visit: row.next_visit,
            last_payment: row.last_payment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all customers, soonest visit first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY next_visit, name"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Fetch a single customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Customers with a visit scheduled in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upcoming(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer \
             WHERE next_visit >= $1 AND next_visit < $2 \
             ORDER BY next_visit, name"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Insert a new customer from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, draft: &CustomerDraft) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customer \
             (name, email, address, notes, visit_time, price, price_type, \
              recurring, work_status, payment_status, next_visit, last_payment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.address)
        .bind(&draft.notes)
        .bind(&draft.visit_time)
        .bind(draft.price)
        .bind(draft.price_type.to_string())
        .bind(draft.recurring.to_string())
        .bind(draft.work_status.to_string())
        .bind(draft.payment_status.to_string())
        .bind(draft.next_visit)
        .bind(draft.last_payment)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace every caller-editable field of an existing customer.
    ///
    /// Returns `None` when no customer has the given id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customer SET \
             name = $2, email = $3, address = $4, notes = $5, visit_time = $6, \
             price = $7, price_type = $8, recurring = $9, work_status = $10, \
             payment_status = $11, next_visit = $12, last_payment = $13, \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.address)
        .bind(&draft.notes)
        .bind(&draft.visit_time)
        .bind(draft.price)
        .bind(draft.price_type.to_string())
        .bind(draft.recurring.to_string())
        .bind(draft.work_status.to_string())
        .bind(draft.payment_status.to_string())
        .bind(draft.next_visit)
        .bind(draft.last_payment)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Write back the lifecycle-owned fields of a reconciled or advanced
    /// customer. Last write wins; the reconcile computation is idempotent,
    /// so racing passes converge instead of contradicting each other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row disappeared,
    /// `RepositoryError::Database` on query failure.
    pub async fn save(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE customer SET \
             work_status = $2, payment_status = $3, next_visit = $4, \
             last_payment = $5, updated_at = now() \
             WHERE id = $1",
        )
        .bind(customer.id.as_uuid())
        .bind(customer.work_status.to_string())
        .bind(customer.payment_status.to_string())
        .bind(customer.next_visit)
        .bind(customer.last_payment)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a customer. Returns whether a row was found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brisa_core::{PaymentStatus, PriceType, Recurrence, WorkStatus};

    fn row() -> CustomerRow {
        let now = Utc::now();
        CustomerRow {
            id: Uuid::new_v4(),
            name: "Ana Torres".to_string(),
            email: None,
            address: Some("12 Oak St".to_string()),
            notes: None,
            visit_time: Some("9:00".to_string()),
            price: Some(Decimal::new(9_500, 2)),
            price_type: "hourly".to_string(),
            recurring: "biweekly".to_string(),
            work_status: "pending".to_string(),
            payment_status: "paid".to_string(),
            next_visit: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
            last_payment: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_converts_to_domain_customer() {
        let customer = Customer::try_from(row()).expect("valid row");
        assert_eq!(customer.price_type, PriceType::Hourly);
        assert_eq!(customer.recurring, Recurrence::Biweekly);
        assert_eq!(customer.work_status, WorkStatus::Pending);
        assert_eq!(customer.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_row_with_unknown_status_is_data_corruption() {
        let mut bad = row();
        bad.payment_status = "refunded".to_string();
        let err = Customer::try_from(bad).expect_err("should fail");
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_row_with_unknown_recurrence_is_data_corruption() {
        let mut bad = row();
        bad.recurring = "daily".to_string();
        assert!(matches!(
            Customer::try_from(bad),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
