//! # Domain Types
//!
//! Core domain types used throughout StockPilot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Movement     │   │ Supplier/       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │ Category        │       │
//! │  │  id             │   │  id             │   │  ─────────────  │       │
//! │  │  sku (unique)   │   │  product_id(FK) │   │  id             │       │
//! │  │  price, cost    │   │  change (≠ 0)   │   │  name           │       │
//! │  │  quantity ◄─────┼───┤  reason         │   │  contact fields │       │
//! │  │  reorder_level  │   │  created_at     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │         ▲                                                               │
//! │         │  quantity == SUM(change) over the product's movements        │
//! │         └── maintained by the ledger repository, never written direct  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record vs Input Types
//! Every persisted entity has:
//! - a record type (`Product`) decoded straight from a database row
//! - an input type (`NewProduct`, `ProductUpdate`) describing what callers
//!   may set — which is how `quantity` stays out of reach of the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Supplier
// =============================================================================

/// A supplier products can reference.
///
/// Referenced by `Product.supplier_id` as a weak link: deleting a supplier
/// nullifies the reference, it does not delete products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    /// Unique identifier (database rowid).
    pub id: i64,

    /// Supplier display name.
    pub name: String,

    /// Contact email, if known.
    pub email: Option<String>,

    /// Contact phone, if known.
    pub phone: Option<String>,

    /// Postal address, if known.
    pub address: Option<String>,
}

/// Input for creating or replacing a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier (database rowid).
    pub id: i64,

    /// Unique category name.
    pub name: String,
}

/// Input for creating or renaming a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A tracked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (database rowid).
    pub id: i64,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Retail price per unit. Never negative.
    pub price: f64,

    /// Acquisition cost per unit. Never negative.
    pub cost: f64,

    /// On-hand quantity. Materialized cache of the movement ledger:
    /// always equals the sum of this product's movement changes, and is
    /// only ever written by the ledger repository.
    pub quantity: i64,

    /// Quantity at or below which the product counts as low stock.
    pub reorder_level: i64,

    /// Whether the product is active (soft retirement flag).
    pub is_active: bool,

    /// Weak reference to a category, nullified if the category is deleted.
    pub category_id: Option<i64>,

    /// Weak reference to a supplier, nullified if the supplier is deleted.
    pub supplier_id: Option<i64>,
}

/// Input for creating a product.
///
/// There is deliberately no `quantity` field: products start at 0 and are
/// stocked through the movement ledger, so the cache/ledger invariant holds
/// from the first row. `deny_unknown_fields` turns an attempt to smuggle a
/// quantity into a deserialization error instead of a silent drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub reorder_level: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub supplier_id: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Partial update for a product. `None` leaves a field unchanged.
///
/// `quantity` is not here and never will be: a direct quantity write would
/// silently desynchronize the cache from the ledger. Manual corrections are
/// movements with reason `"adjustment"`. A patch naming `quantity` fails to
/// deserialize rather than being silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub reorder_level: Option<i64>,
    pub is_active: Option<bool>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

impl ProductUpdate {
    /// True when no field is set (a no-op patch).
    pub fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.cost.is_none()
            && self.reorder_level.is_none()
            && self.is_active.is_none()
            && self.category_id.is_none()
            && self.supplier_id.is_none()
    }
}

/// Filter for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring match against name or SKU.
    pub search: Option<String>,

    /// Restrict to one category.
    pub category_id: Option<i64>,

    /// Restrict to one supplier.
    pub supplier_id: Option<i64>,

    /// Hide retired products (the default).
    pub only_active: bool,
}

impl ProductFilter {
    /// Filter matching all active products.
    pub fn active() -> Self {
        ProductFilter {
            only_active: true,
            ..ProductFilter::default()
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

/// One append-only row of the stock ledger.
///
/// Positive `change` is inbound (purchase, return), negative is outbound
/// (sale, shrinkage). Rows are immutable once written: the ledger is the
/// durable audit trail behind every product's `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Movement {
    /// Unique identifier (database rowid).
    pub id: i64,

    /// The product this movement belongs to. Must exist at insert time.
    pub product_id: i64,

    /// Signed quantity delta. Never zero.
    pub change: i64,

    /// Free-text classification: "purchase", "sale", "adjustment", ...
    pub reason: String,

    /// Optional external reference (order number etc.).
    pub reference: Option<String>,

    /// Set by the system at insert time. Immutable.
    pub created_at: DateTime<Utc>,
}

/// Input for recording a movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMovement {
    pub product_id: i64,
    pub change: i64,
    pub reason: String,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Filter for movement listings. Results are always newest-first.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Restrict to one product.
    pub product_id: Option<i64>,

    /// Only movements created at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

// =============================================================================
// Analytics Views
// =============================================================================

/// Whole-inventory valuation snapshot, over active and inactive products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockValuation {
    /// Total units on hand.
    pub total_quantity: i64,

    /// `SUM(quantity * cost)` - what the stock on hand cost to acquire.
    pub cost_value: f64,

    /// `SUM(quantity * price)` - what the stock on hand would sell for.
    pub retail_value: f64,
}

/// One row of the top-movers ranking: absolute movement volume for a
/// product over a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TopMover {
    pub product_id: i64,
    pub sku: String,
    pub name: String,

    /// `SUM(ABS(change))` within the window.
    pub moved: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
