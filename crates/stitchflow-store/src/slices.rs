//! # Slice Keys and Seed Defaults
//!
//! The nine persisted state slices and the values a fresh installation
//! starts with.
//!
//! ## Slice Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Data Directory (one JSON file per slice)                  │
//! │                                                                         │
//! │  stitchflow_user.json          current signed-in user (or absent)       │
//! │  stitchflow_customers.json     Vec<Customer>      seed: []              │
//! │  stitchflow_orders.json        Vec<Order>         seed: []              │
//! │  stitchflow_measurements.json  Vec<Measurement>   seed: []              │
//! │  stitchflow_services.json      Vec<Service>       seed: 3 entries       │
//! │  stitchflow_inventory.json     Vec<InventoryItem> seed: 2 entries       │
//! │  stitchflow_expenses.json      Vec<Expense>       seed: []              │
//! │  stitchflow_staff.json         Vec<User>          seed: 2 entries       │
//! │  stitchflow_settings.json      ShopSettings       seed: defaults        │
//! │                                                                         │
//! │  Each file is read individually at startup and written as part of       │
//! │  the full snapshot on every mutation.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stitchflow_core::money::Money;
use stitchflow_core::types::{InventoryCategory, InventoryItem, Service, User, UserRole};

// =============================================================================
// Slice Keys
// =============================================================================

/// Identifies one of the nine persisted slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceKey {
    /// The signed-in user. The one slice `logout` removes.
    CurrentUser,
    Customers,
    Orders,
    Measurements,
    Services,
    Inventory,
    Expenses,
    Staff,
    Settings,
}

impl SliceKey {
    /// All nine slices, in snapshot-write order.
    pub const ALL: [SliceKey; 9] = [
        SliceKey::CurrentUser,
        SliceKey::Customers,
        SliceKey::Orders,
        SliceKey::Measurements,
        SliceKey::Services,
        SliceKey::Inventory,
        SliceKey::Expenses,
        SliceKey::Staff,
        SliceKey::Settings,
    ];

    /// Storage key. Doubles as the file stem on disk.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SliceKey::CurrentUser => "stitchflow_user",
            SliceKey::Customers => "stitchflow_customers",
            SliceKey::Orders => "stitchflow_orders",
            SliceKey::Measurements => "stitchflow_measurements",
            SliceKey::Services => "stitchflow_services",
            SliceKey::Inventory => "stitchflow_inventory",
            SliceKey::Expenses => "stitchflow_expenses",
            SliceKey::Staff => "stitchflow_staff",
            SliceKey::Settings => "stitchflow_settings",
        }
    }
}

// =============================================================================
// Seed Defaults
// =============================================================================
// A fresh installation is usable out of the box: a small service
// catalog, a stocked-enough stockroom, and two accounts to sign in
// with. Seed ids are fixed small numbers - they predate the id
// generator and must stay stable across installs.

/// The starter service catalog.
pub fn seed_services() -> Vec<Service> {
    vec![
        Service {
            id: "1".to_string(),
            name: "Standard Shirt Stitching".to_string(),
            base_price: Money::from_rupees(450),
            category: "Shirt".to_string(),
        },
        Service {
            id: "2".to_string(),
            name: "Premium Pant Stitching".to_string(),
            base_price: Money::from_rupees(550),
            category: "Pant".to_string(),
        },
        Service {
            id: "3".to_string(),
            name: "Suit Set (2pc)".to_string(),
            base_price: Money::from_rupees(2500),
            category: "Suit".to_string(),
        },
    ]
}

/// The starter stockroom.
pub fn seed_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem {
            id: "1".to_string(),
            name: "White Cotton Thread".to_string(),
            category: InventoryCategory::Thread,
            stock: 50,
            unit: "Rolls".to_string(),
            low_stock_threshold: 10,
        },
        InventoryItem {
            id: "2".to_string(),
            name: "Premium Suit Buttons".to_string(),
            category: InventoryCategory::Accessory,
            stock: 200,
            unit: "Pcs".to_string(),
            low_stock_threshold: 50,
        },
    ]
}

/// The starter staff roster: one owner, one tailor on payroll.
pub fn seed_staff() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "Admin Owner".to_string(),
            role: UserRole::Owner,
            username: "admin".to_string(),
            salary: None,
            last_salary_paid: None,
        },
        User {
            id: "2".to_string(),
            name: "John Tailor".to_string(),
            role: UserRole::Tailor,
            username: "john".to_string(),
            salary: Some(Money::from_rupees(15000)),
            last_salary_paid: None,
        },
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
