//! # shopkeep-core: Pure Business Logic for Shopkeep
//!
//! This crate holds the inventory and transaction rules of Shopkeep as pure
//! functions and plain data, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopkeep Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shopkeep CLI (apps/cli)                      │   │
//! │  │     item add/edit/delete ──► sell ──► sales list/report         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ shopkeep-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ analytics │  │   │
//! │  │   │   Item    │  │   Money   │  │   Cart    │  │  filter   │  │   │
//! │  │   │   Sale    │  │  (cents)  │  │ CartLine  │  │ aggregate │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  shopkeep-db (Database Layer)                   │   │
//! │  │       SQLite catalog, sales ledger, checkout transactions       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Sale, Renumbering, Receipt, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - In-progress sale bookkeeping
//! - [`analytics`] - Sales filtering and aggregation
//! - [`line_items`] - The `"Name x Qty, ..."` sale summary format
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules and raw-text parsing
//!
//! ## Example Usage
//!
//! ```rust
//! use shopkeep_core::money::Money;
//! use shopkeep_core::validation::parse_price;
//!
//! let price = parse_price("10.00").unwrap();
//! let total = price.multiply_quantity(3);
//! let change = Money::from_cents(5000) - total;
//!
//! assert_eq!(total.cents(), 3000);
//! assert_eq!(change.to_string(), "20.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod cart;
pub mod error;
pub mod line_items;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::{aggregate, filter_sales, ItemUnits, SalesFilter, SalesReport};
pub use cart::{Cart, CartLine, CartStatus};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an item name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a catalog search query, in characters.
pub const MAX_QUERY_LENGTH: usize = 100;

/// Maximum stock level of one item, and so of one cart line.
///
/// Together with [`MAX_PRICE_CENTS`] this keeps every line total well
/// inside `i64` cents.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

/// Maximum unit price, in cents (10,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;
