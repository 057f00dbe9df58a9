//! # Ledger Module
//!
//! Payment math for orders and the salary disbursement rule - the pure
//! half of the system's record mutators.
//!
//! ## The Balance Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Payment Lifecycle                            │
//! │                                                                         │
//! │  Booking              In the workshop           Delivery                │
//! │  ───────              ───────────────           ────────                │
//! │  advance collected    balance outstanding       balance implicitly      │
//! │  (any amount,         = total − advance         settles: paid = total   │
//! │   usually partial)                                                      │
//! │                                                                         │
//! │  paid(order) = advance + (Delivered ? total − advance : 0)              │
//! │  balance(order) = total − paid(order)                                   │
//! │                                                                         │
//! │  settle_payment: advance ← total  (full settlement only; there is       │
//! │  no partial-settlement operation)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions are pure reads over immutable order fields, recomputed
//! on every call - no cached running balances to invalidate.

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Expense, Order, OrderStatus, User};

// =============================================================================
// Order Balance
// =============================================================================

impl Order {
    /// Amount considered paid on this order.
    ///
    /// Delivery implicitly settles the remainder, so a Delivered order
    /// is always fully paid regardless of the recorded advance.
    pub fn paid_amount(&self) -> Money {
        let implicit = if self.status == OrderStatus::Delivered {
            self.total_amount - self.advance_paid
        } else {
            Money::zero()
        };
        self.advance_paid + implicit
    }

    /// Outstanding balance: `total − paid`.
    ///
    /// Non-negative once settlement has run (settlement caps the advance
    /// at the total); before that, an unconstrained hand-entered advance
    /// larger than the total yields a negative balance - the math does
    /// not paper over a data-entry quirk.
    pub fn balance(&self) -> Money {
        self.total_amount - self.paid_amount()
    }

    /// An order is fully paid iff the advance covers the total OR it has
    /// been delivered.
    pub fn is_fully_paid(&self) -> bool {
        self.advance_paid >= self.total_amount || self.status == OrderStatus::Delivered
    }

    /// Full settlement: set the advance equal to the total, zeroing the
    /// balance.
    ///
    /// Returns the amount collected by this settlement. Settling an
    /// already-settled order is a no-op returning zero, so the operation
    /// is idempotent.
    ///
    /// ## Example
    /// ```rust
    /// # use stitchflow_core::money::Money;
    /// # use stitchflow_core::types::*;
    /// # use chrono::{NaiveDate, DateTime, Utc};
    /// # let mut order = Order {
    /// #     id: "1".into(), order_number: "ORD-0001".into(),
    /// #     customer_id: "c1".into(), customer_name: "Rahul".into(),
    /// #     items: vec![], total_amount: Money::from_rupees(1000),
    /// #     advance_paid: Money::from_rupees(400), status: OrderStatus::Ready,
    /// #     delivery_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    /// #     assigned_tailor_id: None, assigned_tailor_name: None,
    /// #     created_at: DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z").unwrap().with_timezone(&Utc),
    /// #     tax_amount: Money::zero(),
    /// # };
    /// let collected = order.settle();
    /// assert_eq!(collected, Money::from_rupees(600));
    /// assert!(order.balance().is_zero());
    /// assert!(order.settle().is_zero()); // second call: no-op
    /// ```
    pub fn settle(&mut self) -> Money {
        let due = self.balance();
        if due.is_zero() {
            return Money::zero();
        }
        self.advance_paid = self.total_amount;
        due
    }
}

// =============================================================================
// Salary Disbursement
// =============================================================================

/// Outcome of a salary disbursement: the expense to append and the staff
/// record with its payment stamp.
#[derive(Debug, Clone)]
pub struct SalaryDisbursement {
    pub expense: Expense,
    pub stamped: User,
}

/// Builds the record pair for paying one staff member's salary.
///
/// Appends nothing and touches no state - the session applies the
/// returned records and persists.
///
/// ## NOT Idempotent - By Contract
/// There is no duplicate-payment guard: disbursing twice on the same day
/// produces two expense entries. The session traces each disbursement so
/// duplicates at least show in the log stream.
///
/// ## Errors
/// - [`CoreError::NoSalaryConfigured`] when the staff member has no
///   salary on record.
pub fn disburse_salary(staff: &User, today: NaiveDate, expense_id: String) -> CoreResult<SalaryDisbursement> {
    let salary = staff.salary.ok_or_else(|| CoreError::NoSalaryConfigured {
        name: staff.name.clone(),
    })?;

    let expense = Expense {
        id: expense_id,
        category: Expense::SALARY_CATEGORY.to_string(),
        amount: salary,
        date: today,
        description: format!("Salary payment - {}", staff.name),
    };

    let mut stamped = staff.clone();
    stamped.last_salary_paid = Some(today);

    Ok(SalaryDisbursement { expense, stamped })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;
    use chrono::{DateTime, Utc};

    fn order(total: i64, advance: i64, status: OrderStatus) -> Order {
        Order {
            id: "1".into(),
            order_number: "ORD-0001".into(),
            customer_id: "c1".into(),
            customer_name: "Rahul Sharma".into(),
            items: vec![],
            total_amount: Money::from_rupees(total),
            advance_paid: Money::from_rupees(advance),
            status,
            delivery_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            assigned_tailor_id: None,
            assigned_tailor_name: None,
            created_at: DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            tax_amount: Money::zero(),
        }
    }

    #[test]
    fn test_paid_amount_pending_order() {
        let o = order(1000, 400, OrderStatus::Pending);
        assert_eq!(o.paid_amount(), Money::from_rupees(400));
        assert_eq!(o.balance(), Money::from_rupees(600));
        assert!(!o.is_fully_paid());
    }

    #[test]
    fn test_delivery_implicitly_settles() {
        let o = order(1000, 400, OrderStatus::Delivered);
        assert_eq!(o.paid_amount(), Money::from_rupees(1000));
        assert!(o.balance().is_zero());
        assert!(o.is_fully_paid());
    }

    #[test]
    fn test_paid_amount_is_a_pure_read() {
        let o = order(1000, 400, OrderStatus::Stitching);
        // Recomputing never drifts: same order, same answer.
        let first = o.paid_amount();
        for _ in 0..10 {
            assert_eq!(o.paid_amount(), first);
        }
    }

    #[test]
    fn test_advance_covering_total_is_fully_paid() {
        let o = order(1000, 1000, OrderStatus::Pending);
        assert!(o.is_fully_paid());
        assert!(o.balance().is_zero());
    }

    #[test]
    fn test_overpaid_advance_yields_negative_balance() {
        // The advance is unconstrained before settlement; the math is
        // honest about it.
        let o = order(1000, 1200, OrderStatus::Pending);
        assert_eq!(o.balance(), Money::from_rupees(-200));
        assert!(o.is_fully_paid());
    }

    #[test]
    fn test_settle_collects_balance_and_is_idempotent() {
        let mut o = order(1000, 400, OrderStatus::Ready);
        let collected = o.settle();
        assert_eq!(collected, Money::from_rupees(600));
        assert_eq!(o.advance_paid, Money::from_rupees(1000));
        assert!(o.balance().is_zero());

        // Settling again is a no-op.
        assert!(o.settle().is_zero());
        assert_eq!(o.advance_paid, Money::from_rupees(1000));
    }

    #[test]
    fn test_balance_non_negative_after_settlement() {
        for (total, advance) in [(1000, 0), (1000, 400), (1000, 1000)] {
            let mut o = order(total, advance, OrderStatus::Stitching);
            o.settle();
            assert!(o.advance_paid <= o.total_amount);
            assert!(!o.balance().is_negative());
        }
    }

    fn tailor(salary: Option<Money>) -> User {
        User {
            id: "2".into(),
            name: "John Tailor".into(),
            role: UserRole::Tailor,
            username: "john".into(),
            salary,
            last_salary_paid: None,
        }
    }

    #[test]
    fn test_disburse_salary() {
        let staff = tailor(Some(Money::from_rupees(15000)));
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let out = disburse_salary(&staff, today, "e1".into()).unwrap();
        assert_eq!(out.expense.category, Expense::SALARY_CATEGORY);
        assert_eq!(out.expense.amount, Money::from_rupees(15000));
        assert_eq!(out.expense.date, today);
        assert_eq!(out.stamped.last_salary_paid, Some(today));
    }

    #[test]
    fn test_disburse_salary_requires_configured_salary() {
        let staff = tailor(None);
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = disburse_salary(&staff, today, "e1".into()).unwrap_err();
        assert!(matches!(err, CoreError::NoSalaryConfigured { .. }));
    }
}
