//! # Repository Module
//!
//! Database repository implementations for StockPilot.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.ledger().record(&new_movement)                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  LedgerRepository                                                      │
//! │  ├── record(&self, new)        one transaction, both writes           │
//! │  └── list(&self, filter)       newest-first, read-only                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • The quantity-write rule is auditable: grep for "SET quantity"       │
//! │    and it only appears in ledger.rs                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`supplier::SupplierRepository`] - Supplier CRUD
//! - [`category::CategoryRepository`] - Category CRUD (unique names)
//! - [`product::ProductRepository`] - Product CRUD and filtered listing
//! - [`ledger::LedgerRepository`] - Append-only movements + quantity cache
//! - [`analytics::AnalyticsRepository`] - Valuation, low-stock, top-movers

pub mod analytics;
pub mod category;
pub mod ledger;
pub mod product;
pub mod supplier;
