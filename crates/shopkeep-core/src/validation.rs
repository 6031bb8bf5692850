//! # Validation Module
//!
//! Input validation utilities for Shopkeep.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (CLI / GUI collaborator)                           │
//! │  ├── Collects raw text                                                 │
//! │  └── Calls the parse_* helpers below                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Format checks (numbers, lengths, emptiness)                      │
//! │  └── Value rules (price > 0, stock >= 0, ...)                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE(name) constraint                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopkeep_core::validation::{parse_price, parse_quantity};
//!
//! let price = parse_price("10.00").unwrap();
//! let qty = parse_quantity("quantity", "3").unwrap();
//! assert_eq!(price.multiply_quantity(qty).cents(), 3000);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_NAME_LENGTH, MAX_PRICE_CENTS, MAX_QUERY_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use shopkeep_core::validation::validate_item_name;
///
/// assert_eq!(validate_item_name("  Shirt ").unwrap(), "Shirt");
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns the whole catalog)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LENGTH,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price: strictly positive, at most [`MAX_PRICE_CENTS`].
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
            max: Money::from_cents(MAX_PRICE_CENTS).to_string(),
        });
    }

    Ok(())
}

/// Validates the opening stock of a newly added item: must be positive.
///
/// Edits and field updates use [`validate_stock_quantity`] instead, which
/// allows zero.
pub fn validate_new_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock level: between zero and [`MAX_ITEM_QUANTITY`].
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tendered payment: must not be negative.
///
/// Zero is allowed here; whether it covers the total is a business rule
/// (`InsufficientPayment`), not a format problem.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Raw Text Parsers
// =============================================================================

/// Parses a decimal amount from raw text for the named field.
///
/// Only checks the format; see [`parse_price`] for the price rule.
pub fn parse_amount(field: &str, text: &str) -> ValidationResult<Money> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Money::parse_decimal(text).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a number with at most two decimal places".to_string(),
    })
}

/// Parses and validates a unit price from raw text.
///
/// ## Example
/// ```rust
/// use shopkeep_core::validation::parse_price;
///
/// assert_eq!(parse_price("10.5").unwrap().cents(), 1050);
/// assert!(parse_price("0").is_err());
/// assert!(parse_price("ten").is_err());
/// ```
pub fn parse_price(text: &str) -> ValidationResult<Money> {
    let price = parse_amount("price", text)?;
    validate_price(price)?;
    Ok(price)
}

/// Parses a whole number from raw text for the named field.
///
/// Only checks the format; callers apply the quantity rule they need.
pub fn parse_quantity(field: &str, text: &str) -> ValidationResult<i64> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    text.parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a whole number".to_string(),
        })
}

/// Parses an item id from raw text. Ids are positive integers.
pub fn parse_item_id(text: &str) -> ValidationResult<i64> {
    let id = parse_quantity("id", text)?;

    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "id".to_string(),
        });
    }

    Ok(id)
}

/// Parses an optional date component (`year`, `month`, `day`).
///
/// Blank text means "not supplied" and yields `None`.
pub fn parse_date_component(field: &str, text: &str, min: i64, max: i64) -> ValidationResult<Option<i64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value = parse_quantity(field, text)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(Some(value))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert_eq!(validate_item_name("Shirt").unwrap(), "Shirt");
        assert_eq!(validate_item_name("  Blue Jeans  ").unwrap(), "Blue Jeans");
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
        assert!(validate_item_name(&"A".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  shi ").unwrap(), "shi");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_price_rules() {
        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
        assert!(validate_price(Money::from_cents(-100)).is_err());

        assert_eq!(parse_price("19.99").unwrap().cents(), 1999);
        assert!(matches!(parse_price(""), Err(ValidationError::Required { .. })));
        assert!(matches!(parse_price("abc"), Err(ValidationError::InvalidFormat { .. })));
        assert!(matches!(parse_price("0.00"), Err(ValidationError::MustBePositive { .. })));
    }

    #[test]
    fn test_price_upper_limit() {
        assert!(validate_price(Money::from_cents(MAX_PRICE_CENTS)).is_ok());
        assert!(matches!(
            validate_price(Money::from_cents(MAX_PRICE_CENTS + 1)),
            Err(ValidationError::TooLarge { .. })
        ));

        let err = parse_price("50000000000000000").unwrap_err();
        assert_eq!(err.to_string(), "price cannot exceed 10000000.00");
    }

    #[test]
    fn test_quantity_rules() {
        assert!(validate_new_quantity(1).is_ok());
        assert!(validate_new_quantity(0).is_err());
        assert!(validate_new_quantity(-1).is_err());

        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());

        assert!(validate_new_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(
            validate_new_quantity(MAX_ITEM_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_stock_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(
            validate_stock_quantity(MAX_ITEM_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));

        assert_eq!(parse_quantity("quantity", " 12 ").unwrap(), 12);
        assert!(matches!(
            parse_quantity("quantity", "1.5"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_quantity("quantity", ""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_payment_amount() {
        assert!(validate_payment_amount(Money::zero()).is_ok());
        assert!(validate_payment_amount(Money::from_cents(5000)).is_ok());
        assert!(validate_payment_amount(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_parse_item_id() {
        assert_eq!(parse_item_id("7").unwrap(), 7);
        assert!(parse_item_id("0").is_err());
        assert!(parse_item_id("seven").is_err());
    }

    #[test]
    fn test_parse_date_component() {
        assert_eq!(parse_date_component("month", "", 1, 12).unwrap(), None);
        assert_eq!(parse_date_component("month", " 3 ", 1, 12).unwrap(), Some(3));
        assert!(parse_date_component("month", "13", 1, 12).is_err());
        assert!(parse_date_component("month", "March", 1, 12).is_err());
    }
}
