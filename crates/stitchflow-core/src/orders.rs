//! # Order Construction
//!
//! Pure assembly and validation of a new order from a booking draft.
//!
//! ## The Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      build_order checks                                 │
//! │                                                                         │
//! │  Draft ──► customer resolves? ──────────── no ──► CustomerNotFound      │
//! │              │ yes                                                      │
//! │              ▼                                                          │
//! │            any line items? ─────────────── no ──► EmptyOrder            │
//! │              │ yes                                                      │
//! │              ▼                                                          │
//! │            per item: quantity valid,                                    │
//! │                      service resolves? ─── no ──► ServiceNotFound       │
//! │              │ yes                                                      │
//! │              ▼                                                          │
//! │            per item: measurement on file                                │
//! │            for the service's category? ─── no ──► MissingMeasurement    │
//! │              │ yes                                (names the category)  │
//! │              ▼                                                          │
//! │            price: base = Σ price×qty                                    │
//! │                   tax  = base × settings.tax_rate (half-up)             │
//! │                   total = base + tax                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timestamps, ids, and the order number flow in as arguments; this
//! module never touches the clock.

use chrono::{DateTime, NaiveDate, Utc};

use crate::analytics::has_measurement_for;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    Customer, Measurement, Order, OrderItem, OrderStatus, Service, ShopSettings, User,
};
use crate::validation::validate_quantity;

// =============================================================================
// Draft Types
// =============================================================================

/// One requested line item: a service reference and a quantity.
#[derive(Debug, Clone)]
pub struct OrderDraftItem {
    pub service_id: String,
    pub quantity: i64,
}

/// A booking request as it comes off the order form.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: String,
    pub items: Vec<OrderDraftItem>,
    /// Advance collected at booking. Unconstrained - may legitimately be
    /// zero, and nothing stops the counter staff entering more than the
    /// total.
    pub advance_paid: Money,
    pub delivery_date: NaiveDate,
    /// Optional tailor assignment. An id that no longer resolves leaves
    /// the order unassigned rather than failing the booking.
    pub assigned_tailor_id: Option<String>,
}

// =============================================================================
// Construction
// =============================================================================

/// Builds a priced, validated order from a draft.
///
/// Checks, in sequence: the customer resolves, the draft has items,
/// every item's quantity and service are valid, and every item's garment
/// category has a matching measurement on file for the customer (the
/// case-insensitive presence heuristic). The first failure wins and the
/// draft is rejected whole.
///
/// Pricing snapshots the service catalog: each item freezes the service
/// name and base price; `total = Σ price×qty + tax` with tax from the
/// CURRENT shop rate. The total never changes afterwards, whatever
/// happens to the rate.
pub fn build_order(
    draft: &OrderDraft,
    customers: &[Customer],
    services: &[Service],
    measurements: &[Measurement],
    staff: &[User],
    settings: &ShopSettings,
    id: String,
    order_number: String,
    created_at: DateTime<Utc>,
) -> CoreResult<Order> {
    let customer = customers
        .iter()
        .find(|c| c.id == draft.customer_id)
        .ok_or_else(|| CoreError::CustomerNotFound(draft.customer_id.clone()))?;

    if draft.items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let mut items = Vec::with_capacity(draft.items.len());
    for requested in &draft.items {
        validate_quantity(requested.quantity)?;

        let service = services
            .iter()
            .find(|s| s.id == requested.service_id)
            .ok_or_else(|| CoreError::ServiceNotFound(requested.service_id.clone()))?;

        if !has_measurement_for(measurements, &customer.id, &service.category) {
            return Err(CoreError::MissingMeasurement {
                customer: customer.name.clone(),
                category: service.category.clone(),
            });
        }

        items.push(OrderItem {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            quantity: requested.quantity,
            price: service.base_price,
        });
    }

    let base: Money = items.iter().map(OrderItem::line_total).sum();
    let tax_amount = base.calculate_tax(settings.tax_rate);

    // A stale tailor id leaves the order unassigned; assignment is a
    // convenience, not a constraint.
    let tailor = draft
        .assigned_tailor_id
        .as_deref()
        .and_then(|id| staff.iter().find(|u| u.id == id));

    Ok(Order {
        id,
        order_number,
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        items,
        total_amount: base + tax_amount,
        advance_paid: draft.advance_paid,
        status: OrderStatus::Pending,
        delivery_date: draft.delivery_date,
        assigned_tailor_id: tailor.map(|t| t.id.clone()),
        assigned_tailor_name: tailor.map(|t| t.name.clone()),
        created_at,
        tax_amount,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GarmentType, UserRole};
    use std::collections::BTreeMap;

    fn fixture() -> (Vec<Customer>, Vec<Service>, Vec<Measurement>, Vec<User>, ShopSettings) {
        let customers = vec![Customer {
            id: "c1".into(),
            name: "Rahul Sharma".into(),
            phone: "9876543210".into(),
            email: None,
            address: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }];
        let services = vec![
            Service {
                id: "s1".into(),
                name: "Standard Shirt Stitching".into(),
                base_price: Money::from_rupees(450),
                category: "Shirt".into(),
            },
            Service {
                id: "s2".into(),
                name: "Premium Pant Stitching".into(),
                base_price: Money::from_rupees(550),
                category: "Pant".into(),
            },
        ];
        let measurements = vec![Measurement {
            id: "m1".into(),
            customer_id: "c1".into(),
            garment: GarmentType::Shirt,
            details: BTreeMap::new(),
            remarks: None,
            updated_at: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        }];
        let staff = vec![User {
            id: "t1".into(),
            name: "John Tailor".into(),
            role: UserRole::Tailor,
            username: "john".into(),
            salary: Some(Money::from_rupees(15000)),
            last_salary_paid: None,
        }];
        (customers, services, measurements, staff, ShopSettings::default())
    }

    fn draft(customer: &str, service: &str, qty: i64) -> OrderDraft {
        OrderDraft {
            customer_id: customer.into(),
            items: vec![OrderDraftItem {
                service_id: service.into(),
                quantity: qty,
            }],
            advance_paid: Money::from_rupees(100),
            delivery_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            assigned_tailor_id: None,
        }
    }

    fn created_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn build(
        d: &OrderDraft,
        fx: &(Vec<Customer>, Vec<Service>, Vec<Measurement>, Vec<User>, ShopSettings),
    ) -> CoreResult<Order> {
        build_order(
            d,
            &fx.0,
            &fx.1,
            &fx.2,
            &fx.3,
            &fx.4,
            "o1".into(),
            "ORD-0001".into(),
            created_at(),
        )
    }

    #[test]
    fn test_build_order_prices_with_tax() {
        let fx = fixture();
        let order = build(&draft("c1", "s1", 2), &fx).unwrap();

        // 2 × ₹450 = ₹900 base; 5% tax = ₹45; total ₹945.
        assert_eq!(order.items_total(), Money::from_rupees(900));
        assert_eq!(order.tax_amount, Money::from_rupees(45));
        assert_eq!(order.total_amount, Money::from_rupees(945));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer_name, "Rahul Sharma");
        assert_eq!(order.items[0].service_name, "Standard Shirt Stitching");
    }

    #[test]
    fn test_build_order_rejects_unknown_customer() {
        let fx = fixture();
        let err = build(&draft("nope", "s1", 1), &fx).unwrap_err();
        assert!(matches!(err, CoreError::CustomerNotFound(_)));
    }

    #[test]
    fn test_build_order_rejects_empty_draft() {
        let fx = fixture();
        let mut d = draft("c1", "s1", 1);
        d.items.clear();
        assert!(matches!(build(&d, &fx).unwrap_err(), CoreError::EmptyOrder));
    }

    #[test]
    fn test_build_order_rejects_unknown_service() {
        let fx = fixture();
        let err = build(&draft("c1", "nope", 1), &fx).unwrap_err();
        assert!(matches!(err, CoreError::ServiceNotFound(_)));
    }

    #[test]
    fn test_missing_measurement_names_the_category() {
        let fx = fixture();
        // Customer has a Shirt fitting but no Pant fitting.
        let err = build(&draft("c1", "s2", 1), &fx).unwrap_err();
        match err {
            CoreError::MissingMeasurement { customer, category } => {
                assert_eq!(customer, "Rahul Sharma");
                assert_eq!(category, "Pant");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_order_succeeds_after_measurement_recorded() {
        let mut fx = fixture();
        let d = draft("c1", "s2", 1);
        assert!(build(&d, &fx).is_err());

        // Record the missing Pant fitting; the same draft now books.
        fx.2.push(Measurement {
            id: "m2".into(),
            customer_id: "c1".into(),
            garment: GarmentType::Pant,
            details: BTreeMap::new(),
            remarks: None,
            updated_at: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        });
        let order = build(&d, &fx).unwrap();
        assert_eq!(order.total_amount, Money::from_paise(57750)); // 550 + 5%
    }

    #[test]
    fn test_build_order_rejects_bad_quantity() {
        let fx = fixture();
        let err = build(&draft("c1", "s1", 0), &fx).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_stale_tailor_id_leaves_order_unassigned() {
        let fx = fixture();

        let mut d = draft("c1", "s1", 1);
        d.assigned_tailor_id = Some("t1".into());
        let order = build(&d, &fx).unwrap();
        assert_eq!(order.assigned_tailor_name.as_deref(), Some("John Tailor"));

        d.assigned_tailor_id = Some("gone".into());
        let order = build(&d, &fx).unwrap();
        assert!(order.assigned_tailor_id.is_none());
        assert!(order.assigned_tailor_name.is_none());
    }
}
