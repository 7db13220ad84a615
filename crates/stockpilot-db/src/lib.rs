//! # stockpilot-db: Database Layer for StockPilot
//!
//! This crate provides database access for the StockPilot inventory system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StockPilot Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /movements)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockpilot-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (supplier,    │    │  (embedded)  │  │   │
//! │  │   │               │    │  category,    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  product,     │    │ 001_initial_ │  │   │
//! │  │   │ Connection    │    │  ledger,      │    │ schema.sql   │  │   │
//! │  │   │ Management    │    │  analytics)   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys ON)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, ledger, analytics)
//!
//! ## The Ledger Rule
//!
//! `products.quantity` is written by exactly one code path:
//! [`repository::ledger::LedgerRepository::record`], inside the same
//! transaction that appends the movement row. Every other repository treats
//! quantity as read-only.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockpilot_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/stockpilot.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let movement = db.ledger().record(&new_movement).await?;
//! let valuation = db.analytics().stock_valuation().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::analytics::AnalyticsRepository;
pub use repository::category::CategoryRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::product::ProductRepository;
pub use repository::supplier::SupplierRepository;
