//! # Domain Types
//!
//! Core domain types used throughout StitchFlow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Customer     │   │      Order      │   │   Measurement   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id             │   │  id             │   │  id             │        │
//! │  │  phone (soft    │◄──│  customer_id    │   │  customer_id    │        │
//! │  │   business key) │   │  items[]        │   │  garment        │        │
//! │  │  created_at     │   │  total_amount   │   │  details{}      │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Service      │   │  InventoryItem  │   │     Expense     │        │
//! │  │  category ──────┼───┼─► (soft link to │   │  category       │        │
//! │  │  base_price     │   │   garment type) │   │  amount, date   │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries an opaque `String` id generated from the creation
//! wall-clock (milliseconds since epoch). Ids are stable for the entity's
//! life and unique in practice but carry NO collision-free guarantee -
//! two creations in the same millisecond would collide. The store layer
//! owns id generation; nothing in this crate touches the clock.
//!
//! ## Referential Integrity
//! There is none. Deleting a customer orphans their orders and
//! measurements; read paths must tolerate a failed lookup by rendering a
//! placeholder instead of erroring.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (the default GST slab the shop charges)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// User / Staff
// =============================================================================

/// Staff role. Gates navigation and order visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Shop owner: sees everything, manages staff and money.
    Owner,
    /// Tailor: sees only orders assigned to them.
    Tailor,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Owner => write!(f, "OWNER"),
            UserRole::Tailor => write!(f, "TAILOR"),
        }
    }
}

/// A staff member. Doubles as the login principal - there is no separate
/// account entity and no password field (username presence is sufficient
/// authentication, a documented limitation of the system).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Role, gates visibility.
    pub role: UserRole,

    /// Login handle, stored lowercase.
    pub username: String,

    /// Monthly salary, if the member is on payroll.
    pub salary: Option<Money>,

    /// Date of the most recent salary disbursement.
    pub last_salary_paid: Option<NaiveDate>,
}

impl User {
    /// Checks whether this user holds the owner role.
    #[inline]
    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
///
/// `phone` is a soft-unique business key: duplicates are rejected at
/// creation time only (exact trimmed-string comparison, no format
/// normalization), never re-checked on edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDate,
}

// =============================================================================
// Measurement
// =============================================================================

/// Garment category a measurement was taken for.
///
/// The link from an order line item to a measurement goes through a
/// CASE-INSENSITIVE string comparison between `Service::category` and
/// this type's name - a deliberately loose coupling. A service category
/// outside this set (the seeded "Suit", say) can never match a
/// measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GarmentType {
    Shirt,
    Pant,
    Custom,
}

impl GarmentType {
    /// Canonical name used for the category heuristic and display.
    pub const fn as_str(&self) -> &'static str {
        match self {
            GarmentType::Shirt => "Shirt",
            GarmentType::Pant => "Pant",
            GarmentType::Custom => "Custom",
        }
    }

    /// The measurement-presence heuristic's comparison: does this
    /// garment type answer for the given service category?
    ///
    /// ## Example
    /// ```rust
    /// use stitchflow_core::types::GarmentType;
    ///
    /// assert!(GarmentType::Shirt.matches_category("shirt"));
    /// assert!(GarmentType::Shirt.matches_category("SHIRT"));
    /// assert!(!GarmentType::Shirt.matches_category("Suit"));
    /// ```
    pub fn matches_category(&self, category: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(category.trim())
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded fitting for one customer and one garment category.
///
/// `details` maps a dimension label ("Collar", "Waist", ...) to the
/// recorded value as entered. Values stay strings - the tape reading is
/// what the tailor wrote down, fractions and all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,

    /// Customer this fitting belongs to. Not cascade-checked on customer
    /// delete; a dangling reference renders as a placeholder.
    pub customer_id: String,

    /// Garment category. Persisted under the historical key "type".
    #[serde(rename = "type")]
    pub garment: GarmentType,

    /// Dimension label → recorded value, in label order.
    pub details: BTreeMap<String, String>,

    /// Free-form fitting notes; advisory styling tips land here too.
    pub remarks: Option<String>,

    pub updated_at: NaiveDate,
}

/// Dimension labels offered for a shirt fitting.
pub const SHIRT_MEASUREMENT_FIELDS: &[&str] = &[
    "Collar",
    "Chest",
    "Waist",
    "Sleeve Length",
    "Shoulder",
    "Full Length",
];

/// Dimension labels offered for a pant fitting.
pub const PANT_MEASUREMENT_FIELDS: &[&str] =
    &["Waist", "Hip", "Thigh", "Length", "Bottom", "Inseam"];

// =============================================================================
// Order
// =============================================================================

/// Workshop status of an order.
///
/// ## Transitions
/// The full set is selectable from any state - there is no enforced
/// linear progression. `Delivered` is the one status with ledger
/// meaning: delivery implicitly settles the outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Stitching,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// All statuses in workshop order, for pickers and filters.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Stitching,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    /// Display string, matching the persisted representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Stitching => "Stitching",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// A line item in an order.
/// Uses snapshot pattern to freeze service data at time of booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub service_id: String,
    /// Service name at time of booking (frozen).
    pub service_name: String,
    pub quantity: i64,
    /// Unit price at time of booking (frozen).
    pub price: Money,
}

impl OrderItem {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// A tailoring order.
///
/// ## Pricing Invariant
/// `total_amount = Σ(item.price × item.quantity) + tax_amount`, fixed at
/// creation. Later tax-rate changes never retroactively reprice an
/// existing order.
///
/// ## Payment Invariant
/// `advance_paid ≤ total_amount` is expected but only enforced by the
/// settlement path; a hand-edited advance may exceed the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,

    /// Human-facing booking reference ("ORD-0042").
    pub order_number: String,

    pub customer_id: String,

    /// Customer name at time of booking (denormalized; survives customer
    /// deletion).
    pub customer_name: String,

    pub items: Vec<OrderItem>,

    /// Grand total including tax, fixed at creation.
    pub total_amount: Money,

    /// Amount collected up front.
    pub advance_paid: Money,

    pub status: OrderStatus,

    pub delivery_date: NaiveDate,

    pub assigned_tailor_id: Option<String>,

    /// Tailor name at time of assignment (denormalized).
    pub assigned_tailor_name: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Tax portion of `total_amount`, kept separately for the liability
    /// rollup.
    pub tax_amount: Money,
}

impl Order {
    /// Sum of the line totals, before tax.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

// =============================================================================
// Service Catalog
// =============================================================================

/// A catalog entry the shop offers.
///
/// `category` drives measurement-type matching (see
/// [`GarmentType::matches_category`]); it is free text, so a typo here
/// silently breaks the gate for this service. Kept loose on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub base_price: Money,
    pub category: String,
}

// =============================================================================
// Inventory
// =============================================================================

/// Stockroom category for an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCategory {
    Fabric,
    Accessory,
    Thread,
    Other,
}

impl fmt::Display for InventoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InventoryCategory::Fabric => "Fabric",
            InventoryCategory::Accessory => "Accessory",
            InventoryCategory::Thread => "Thread",
            InventoryCategory::Other => "Other",
        };
        f.write_str(s)
    }
}

/// A stockroom item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: InventoryCategory,
    pub stock: i64,
    /// Unit of measure for `stock` ("Rolls", "Pcs", "Meters").
    pub unit: String,
    pub low_stock_threshold: i64,
}

impl InventoryItem {
    /// Low-stock check. The boundary counts: stock exactly at the
    /// threshold is flagged low.
    ///
    /// ## Example
    /// ```rust
    /// # use stitchflow_core::types::{InventoryItem, InventoryCategory};
    /// let item = InventoryItem {
    ///     id: "1".into(),
    ///     name: "White Cotton Thread".into(),
    ///     category: InventoryCategory::Thread,
    ///     stock: 10,
    ///     unit: "Rolls".into(),
    ///     low_stock_threshold: 10,
    /// };
    /// assert!(item.is_low_stock());
    /// ```
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A money-out ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    /// Free-text category ("Rent", "Electricity", "Salary", ...).
    pub category: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
}

impl Expense {
    /// Category under which salary disbursements are booked.
    pub const SALARY_CATEGORY: &'static str = "Salary";
}

// =============================================================================
// Shop Settings
// =============================================================================

/// Singleton shop configuration (not a collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    /// Tax applied to new orders. Changing it affects future orders
    /// only.
    pub tax_rate: TaxRate,
    pub shop_name: String,
    pub address: String,
    /// Currency symbol for display ("₹").
    pub currency: String,
}

impl Default for ShopSettings {
    /// The seed configuration a fresh installation starts with.
    fn default() -> Self {
        ShopSettings {
            tax_rate: TaxRate::from_bps(500), // 5%
            shop_name: "StitchFlow Pro".to_string(),
            address: "123 Fashion Street, New Delhi".to_string(),
            currency: "₹".to_string(),
        }
    }
}

impl ShopSettings {
    /// Formats a money amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use stitchflow_core::money::Money;
    /// use stitchflow_core::types::ShopSettings;
    ///
    /// let settings = ShopSettings::default();
    /// assert_eq!(settings.format_currency(Money::from_paise(45050)), "₹450.50");
    /// assert_eq!(settings.format_currency(Money::from_paise(-550)), "-₹5.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency,
            amount.rupees().abs(),
            amount.paise_part()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
