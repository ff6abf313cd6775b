//! The customer lifecycle engine.
//!
//! Two pure, total operations over a [`Customer`]:
//!
//! - [`reconcile`] - read-time status repair applied to every fetched record
//! - [`advance`] - the transition applied when a job is marked complete
//!
//! Both take `today` as an explicit argument. Callers compute it once per
//! request (from the local calendar, not UTC) and reuse it for the whole
//! batch so a single pass is internally consistent.

use chrono::{Days, Months, NaiveDate};

use crate::customer::{Customer, PaymentStatus, Recurrence, WorkStatus};

/// Read-time status correction.
///
/// Applies, in order, two independent rules (both may fire on one record):
///
/// 1. Auto-overdue: a pending payment whose visit date has passed becomes
///    overdue.
/// 2. New-cycle reset: a completed-and-paid job whose visit date has
///    arrived is reset to pending work for the next cycle.
///
/// Returns `Some(updated)` when anything changed, `None` when the record
/// is already consistent (the caller skips the store write). Idempotent:
/// reconciling an already-reconciled record changes nothing.
#[must_use]
pub fn reconcile(customer: &Customer, today: NaiveDate) -> Option<Customer> {
    let mut updated = customer.clone();

    if updated.payment_status == PaymentStatus::Pending && updated.next_visit < today {
        updated.payment_status = PaymentStatus::Overdue;
    }

    if updated.work_status == WorkStatus::Completed
        && updated.payment_status == PaymentStatus::Paid
        && updated.next_visit <= today
    {
        updated.work_status = WorkStatus::Pending;
    }

    (updated != *customer).then_some(updated)
}

/// Job-completion transition.
///
/// Unconditionally marks the work completed, the payment pending, and
/// clears `last_payment`. Recurring customers have `next_visit` advanced
/// by their cadence, computed from the current `next_visit` rather than
/// from `today` so that completing a job late never drifts the schedule.
///
/// `today` is unused for now but stays in the signature: the transition is
/// clock-dependent in principle and callers already thread a fixed date.
#[must_use]
pub fn advance(customer: &Customer, _today: NaiveDate) -> Customer {
    let mut updated = customer.clone();
    updated.work_status = WorkStatus::Completed;
    updated.payment_status = PaymentStatus::Pending;
    updated.last_payment = None;

    if updated.recurring != Recurrence::None {
        updated.next_visit = add_interval(updated.next_visit, updated.recurring);
    }

    updated
}

/// Advance a calendar date by one recurrence interval.
///
/// Weekly is +7 days, biweekly +14, monthly +1 calendar month with the
/// day-of-month clamped to the last valid day when the target month is
/// shorter (Jan 31 -> Feb 28, or Feb 29 in a leap year). `chrono::Months`
/// implements exactly that clamp.
#[must_use]
pub fn add_interval(date: NaiveDate, recurrence: Recurrence) -> NaiveDate {
    match recurrence {
        Recurrence::None => date,
        Recurrence::Weekly => date.checked_add_days(Days::new(7)).unwrap_or(date),
        Recurrence::Biweekly => date.checked_add_days(Days::new(14)).unwrap_or(date),
        Recurrence::Monthly => date.checked_add_months(Months::new(1)).unwrap_or(date),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::customer::{CustomerId, PriceType};

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid test date")
    }

    fn customer(next_visit: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id: CustomerId::new(Uuid::new_v4()),
            name: "Maria Lopez".to_string(),
            email: Some("maria@example.com".to_string()),
            address: None,
            notes: None,
            visit_time: None,
            price: None,
            price_type: PriceType::Fixed,
            recurring: Recurrence::None,
            work_status: WorkStatus::Pending,
            payment_status: PaymentStatus::Pending,
            next_visit: date(next_visit),
            last_payment: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ------------------------------------------------------------------
    // reconcile
    // ------------------------------------------------------------------

    #[test]
    fn test_reconcile_marks_past_pending_payment_overdue() {
        let c = customer("2020-01-01");
        let updated = reconcile(&c, date("2025-01-01")).expect("should change");
        assert_eq!(updated.payment_status, PaymentStatus::Overdue);
        assert_eq!(updated.work_status, WorkStatus::Pending);
    }

    #[test]
    fn test_reconcile_leaves_today_and_future_visits_pending() {
        let c = customer("2025-03-10");
        // Visit exactly today: not overdue (strict comparison).
        assert!(reconcile(&c, date("2025-03-10")).is_none());
        assert!(reconcile(&c, date("2025-03-01")).is_none());
    }

    #[test]
    fn test_reconcile_resets_completed_paid_for_new_cycle() {
        let mut c = customer("2025-03-10");
        c.work_status = WorkStatus::Completed;
        c.payment_status = PaymentStatus::Paid;

        // Due today: reset fires on <=.
        let updated = reconcile(&c, date("2025-03-10")).expect("should change");
        assert_eq!(updated.work_status, WorkStatus::Pending);
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_reconcile_does_not_reset_before_visit_date() {
        let mut c = customer("2025-03-10");
        c.work_status = WorkStatus::Completed;
        c.payment_status = PaymentStatus::Paid;
        assert!(reconcile(&c, date("2025-03-09")).is_none());
    }

    #[test]
    fn test_reconcile_does_not_reset_unpaid_completed_work() {
        let mut c = customer("2025-03-10");
        c.work_status = WorkStatus::Completed;
        c.payment_status = PaymentStatus::Pending;

        // Payment rule fires (visit is past), reset rule must not.
        let updated = reconcile(&c, date("2025-03-11")).expect("should change");
        assert_eq!(updated.work_status, WorkStatus::Completed);
        assert_eq!(updated.payment_status, PaymentStatus::Overdue);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut c = customer("2024-12-25");
        c.work_status = WorkStatus::Completed;
        let today = date("2025-01-01");

        let once = reconcile(&c, today).expect("should change");
        assert!(reconcile(&once, today).is_none());
    }

    #[test]
    fn test_reconcile_returns_none_when_nothing_changes() {
        let c = customer("2025-06-01");
        assert!(reconcile(&c, date("2025-05-01")).is_none());
    }

    #[test]
    fn test_reconcile_overdue_stays_overdue() {
        let mut c = customer("2020-01-01");
        c.payment_status = PaymentStatus::Overdue;
        assert!(reconcile(&c, date("2025-01-01")).is_none());
    }

    // ------------------------------------------------------------------
    // advance
    // ------------------------------------------------------------------

    #[test]
    fn test_advance_non_recurring_keeps_next_visit() {
        let mut c = customer("2025-06-01");
        c.last_payment = Some(date("2025-05-01"));
        c.payment_status = PaymentStatus::Paid;

        let updated = advance(&c, date("2025-06-03"));
        assert_eq!(updated.work_status, WorkStatus::Completed);
        assert_eq!(updated.payment_status, PaymentStatus::Pending);
        assert_eq!(updated.last_payment, None);
        assert_eq!(updated.next_visit, date("2025-06-01"));
    }

    #[test]
    fn test_advance_weekly_adds_seven_days() {
        let mut c = customer("2025-01-01");
        c.recurring = Recurrence::Weekly;
        let updated = advance(&c, date("2025-01-01"));
        assert_eq!(updated.next_visit, date("2025-01-08"));
    }

    #[test]
    fn test_advance_biweekly_adds_fourteen_days() {
        let mut c = customer("2025-06-01");
        c.recurring = Recurrence::Biweekly;
        c.work_status = WorkStatus::Completed;

        let updated = advance(&c, date("2025-06-02"));
        assert_eq!(updated.work_status, WorkStatus::Completed);
        assert_eq!(updated.payment_status, PaymentStatus::Pending);
        assert_eq!(updated.next_visit, date("2025-06-15"));
    }

    #[test]
    fn test_advance_schedules_from_next_visit_not_today() {
        // Completing a job five days late must not drift the cadence.
        let mut c = customer("2025-01-06");
        c.recurring = Recurrence::Weekly;
        let updated = advance(&c, date("2025-01-11"));
        assert_eq!(updated.next_visit, date("2025-01-13"));
    }

    #[test]
    fn test_advance_monthly_clamps_to_end_of_february() {
        let mut c = customer("2025-01-31");
        c.recurring = Recurrence::Monthly;
        // 2025 is not a leap year.
        assert_eq!(advance(&c, date("2025-01-31")).next_visit, date("2025-02-28"));

        c.next_visit = date("2024-01-31");
        // 2024 is.
        assert_eq!(advance(&c, date("2024-01-31")).next_visit, date("2024-02-29"));
    }

    #[test]
    fn test_advance_monthly_preserves_day_when_it_fits() {
        let mut c = customer("2025-04-15");
        c.recurring = Recurrence::Monthly;
        assert_eq!(advance(&c, date("2025-04-15")).next_visit, date("2025-05-15"));
    }

    #[test]
    fn test_advance_monthly_clamp_across_31_to_30() {
        let mut c = customer("2025-03-31");
        c.recurring = Recurrence::Monthly;
        assert_eq!(advance(&c, date("2025-03-31")).next_visit, date("2025-04-30"));
    }

    // ------------------------------------------------------------------
    // add_interval
    // ------------------------------------------------------------------

    #[test]
    fn test_add_interval_none_is_identity() {
        let d = date("2025-07-04");
        assert_eq!(add_interval(d, Recurrence::None), d);
    }

    #[test]
    fn test_add_interval_crosses_year_boundary() {
        assert_eq!(
            add_interval(date("2024-12-31"), Recurrence::Weekly),
            date("2025-01-07")
        );
        assert_eq!(
            add_interval(date("2024-12-15"), Recurrence::Monthly),
            date("2025-01-15")
        );
    }
}
