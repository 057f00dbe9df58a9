//! # Job Card
//!
//! The printable per-order document listing matched measurements for the
//! workshop handoff. Pure read-side formatting - compiling or rendering
//! a job card mutates nothing.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Job Card Pipeline                                 │
//! │                                                                         │
//! │  Order ─┬─► per line item: match measurements by the same               │
//! │         │   category/type heuristic the booking gate used               │
//! │         │        │                                                      │
//! │         │        ├── match found ──► dimensions + remarks               │
//! │         │        └── none on file ─► placeholder entry (an orphaned     │
//! │         │                            order still prints)                │
//! │         ▼                                                               │
//! │  JobCard (typed document) ──► render() ──► fixed-width text             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;

use crate::analytics::measurements_for;
use crate::types::{Measurement, Order, Service, ShopSettings};

/// Printable line width. Matches a 48-column thermal/dot-matrix slip.
const CARD_WIDTH: usize = 48;

// =============================================================================
// Document Types
// =============================================================================

/// One garment section of the job card.
#[derive(Debug, Clone)]
pub struct JobCardItem {
    pub service_name: String,
    pub quantity: i64,
    /// Dimension label → value pairs pulled from the matched
    /// measurement, in label order. Empty when nothing is on file.
    pub dimensions: Vec<(String, String)>,
    /// Fitting notes from the matched measurement.
    pub remarks: Option<String>,
    /// False when no measurement answered for the service's category -
    /// the rendered card flags the gap instead of failing.
    pub measured: bool,
}

/// A compiled job card, ready to render.
#[derive(Debug, Clone)]
pub struct JobCard {
    pub shop_name: String,
    pub shop_address: String,
    pub order_number: String,
    pub customer_name: String,
    pub status: String,
    pub delivery_date: String,
    pub items: Vec<JobCardItem>,
    pub total: String,
    pub paid: String,
    pub balance: String,
}

impl JobCard {
    /// Compiles a job card for one order.
    ///
    /// Measurements are matched per line item with the same
    /// case-insensitive category heuristic that gated the booking: the
    /// item's service resolves to its catalog category, and any fitting
    /// for the order's customer with a matching garment type answers.
    /// A deleted service or deleted measurement leaves the item flagged
    /// as unmeasured - the card still prints.
    pub fn compile(
        order: &Order,
        measurements: &[Measurement],
        services: &[Service],
        settings: &ShopSettings,
    ) -> JobCard {
        let items = order
            .items
            .iter()
            .map(|item| {
                // Resolve the frozen line item back to its catalog
                // category; newest fitting wins when several are on
                // file.
                let fitting = services
                    .iter()
                    .find(|s| s.id == item.service_id)
                    .and_then(|service| {
                        measurements_for(measurements, &order.customer_id, &service.category)
                            .into_iter()
                            .max_by_key(|m| m.updated_at)
                    });

                match fitting {
                    Some(m) => JobCardItem {
                        service_name: item.service_name.clone(),
                        quantity: item.quantity,
                        dimensions: m
                            .details
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                        remarks: m.remarks.clone(),
                        measured: true,
                    },
                    None => JobCardItem {
                        service_name: item.service_name.clone(),
                        quantity: item.quantity,
                        dimensions: Vec::new(),
                        remarks: None,
                        measured: false,
                    },
                }
            })
            .collect();

        JobCard {
            shop_name: settings.shop_name.clone(),
            shop_address: settings.address.clone(),
            order_number: order.order_number.clone(),
            customer_name: order.customer_name.clone(),
            status: order.status.to_string(),
            delivery_date: order.delivery_date.to_string(),
            items,
            total: settings.format_currency(order.total_amount),
            paid: settings.format_currency(order.paid_amount()),
            balance: settings.format_currency(order.balance()),
        }
    }

    /// Renders the card as fixed-width text for printing.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(CARD_WIDTH);
        let thin = "-".repeat(CARD_WIDTH);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^CARD_WIDTH$}", self.shop_name);
        let _ = writeln!(out, "{:^CARD_WIDTH$}", self.shop_address);
        let _ = writeln!(out, "{:^CARD_WIDTH$}", "* JOB CARD *");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Order    : {}", self.order_number);
        let _ = writeln!(out, "Customer : {}", self.customer_name);
        let _ = writeln!(out, "Status   : {}", self.status);
        let _ = writeln!(out, "Due date : {}", self.delivery_date);

        for item in &self.items {
            let _ = writeln!(out, "{thin}");
            let _ = writeln!(out, "{} x{}", item.service_name, item.quantity);
            if item.measured {
                for (label, value) in &item.dimensions {
                    let _ = writeln!(out, "  {label:<20} {value:>6}\"");
                }
                if let Some(remarks) = &item.remarks {
                    let _ = writeln!(out, "  Notes: {remarks}");
                }
            } else {
                let _ = writeln!(out, "  (no measurement on file)");
            }
        }

        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "Total    : {}", self.total);
        let _ = writeln!(out, "Paid     : {}", self.paid);
        let _ = writeln!(out, "Balance  : {}", self.balance);
        let _ = writeln!(out, "{rule}");
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
