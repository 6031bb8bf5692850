//! # Repository Module
//!
//! Database repository implementations for Shopkeep.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.items().search("shirt")                                    │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── add / add_batch                                                   │
//! │  ├── edit / update                                                     │
//! │  ├── delete (→ Renumbering)                                            │
//! │  └── search / list_all / find                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Connection-level helpers (`pub(crate)`) let the checkout engine run   │
//! │  the same statements inside its own transactions.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Stock catalog
//! - [`SaleRepository`](sale::SaleRepository) - Append-only sales ledger

pub mod item;
pub mod sale;
