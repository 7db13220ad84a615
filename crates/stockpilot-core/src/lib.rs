//! # stockpilot-core: Pure Domain Logic for StockPilot
//!
//! This crate is the **heart** of StockPilot. It contains the domain model
//! and input validation as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      StockPilot Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/rest-api)                     │   │
//! │  │    suppliers ─ categories ─ products ─ movements ─ analytics   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockpilot-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐       ┌───────────┐       ┌───────────┐        │   │
//! │  │   │   types   │       │validation │       │   error   │        │   │
//! │  │   │  Product  │       │   rules   │       │Validation │        │   │
//! │  │   │  Movement │       │   checks  │       │  Error    │        │   │
//! │  │   └───────────┘       └───────────┘       └───────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  stockpilot-db (Database Layer)                 │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Movement, Supplier, Category, ...)
//! - [`error`] - Validation error type
//! - [`validation`] - Input validation rules
//!
//! ## The One Invariant That Matters
//!
//! A product's `quantity` is a materialized cache: it must always equal the
//! sum of the `change` values of its movements. This crate defines the types
//! and input contracts; `stockpilot-db`'s ledger repository is the only code
//! allowed to write `quantity`, and does so in the same transaction that
//! appends the movement row.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockpilot_core::Product` instead of
// `use stockpilot_core::types::Product`

pub use error::ValidationError;
pub use types::*;
