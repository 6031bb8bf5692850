//! # Error Types
//!
//! Domain-specific error types for shopkeep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopkeep-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopkeep-db errors (separate crate)                                   │
//! │  └── DbError          - Storage failures (wraps CoreError)             │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → Terminal     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, id, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. None of them is fatal:
/// the operation is rejected and the caller re-renders current state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No catalog item has this id.
    ///
    /// ## When This Occurs
    /// - Id typed by the operator doesn't exist
    /// - Item was deleted (and the catalog renumbered) while a cart held it
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Another live item already uses this name.
    ///
    /// Names are compared exactly (case-sensitive), as stored.
    #[error("An item named '{name}' already exists")]
    DuplicateName { name: String },

    /// Not enough stock to reserve the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (Hat, qty: 3)
    ///      │
    ///      ▼
    /// Check stock: available=2
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Hat", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient quantity for Hat: only 2 available"
    /// ```
    #[error("Insufficient quantity for {name}: only {available} available, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A cart quantity that is zero or negative.
    #[error("Invalid quantity {requested}: must be a positive number")]
    InvalidQuantity { requested: i64 },

    /// Payment does not cover the cart total.
    #[error("Insufficient payment: total is {total}, tendered {tendered}")]
    InsufficientPayment { total: Money, tendered: Money },

    /// The cart was already checked out; start a new one.
    #[error("Cart has already been checked out")]
    CartClosed,

    /// A row of a batch add failed; nothing from the batch was written.
    ///
    /// `row` is 1-based, matching what the operator sees.
    #[error("Batch rejected at row {row}: {source}")]
    BatchRowRejected {
        row: usize,
        source: Box<CoreError>,
    },

    /// A sale's item summary could not be split into `name x qty` entries.
    #[error("Malformed line item '{entry}' in sale summary")]
    MalformedLineItems { entry: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Wraps an error as the rejection reason of batch row `row` (1-based).
    pub fn at_batch_row(self, row: usize) -> Self {
        CoreError::BatchRowRejected {
            row,
            source: Box::new(self),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a value doesn't meet requirements, before any
/// business rule or storage is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount is larger than the store can represent or allows.
    #[error("{field} cannot exceed {max}")]
    TooLarge { field: String, max: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., non-numeric price, bad timestamp).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
