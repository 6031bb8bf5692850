//! # CLI Error Type
//!
//! Every command returns `Result<_, CliError>`. Lower-layer errors are
//! converted here into a machine-readable code, an operator-facing message
//! and a process exit code.
//!
//! ```text
//!   shopkeep-core ── CoreError / ValidationError ──┐
//!                                                  ├──► CliError ──► stderr + exit code
//!   shopkeep-db ──── DbError ──────────────────────┘
//! ```
//!
//! With `--json` the error is printed as:
//! ```json
//! { "code": "INSUFFICIENT_STOCK", "message": "Insufficient quantity for Hat: only 2 available, requested 3" }
//! ```

use serde::Serialize;
use shopkeep_core::{CoreError, ValidationError};
use shopkeep_db::DbError;

/// Error reported by a `shopkeep` command.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, one per family of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input text failed validation
    ValidationError,

    /// Unknown item or sale id
    NotFound,

    /// Item name already in use
    DuplicateName,

    /// Not enough stock to reserve
    InsufficientStock,

    /// Payment below the cart total
    PaymentError,

    /// Cart already checked out
    CartError,

    /// A stored sale summary could not be read
    MalformedData,

    /// Storage failure
    DatabaseError,

    /// Anything else (I/O, JSON)
    Internal,
}

impl ErrorCode {
    /// Process exit code for this family of failure.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::DuplicateName
            | ErrorCode::InsufficientStock
            | ErrorCode::PaymentError
            | ErrorCode::CartError => 4,
            ErrorCode::MalformedData | ErrorCode::DatabaseError => 5,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::new(core_code(&err), err.to_string())
    }
}

fn core_code(err: &CoreError) -> ErrorCode {
    match err {
        CoreError::ItemNotFound(_) => ErrorCode::NotFound,
        CoreError::DuplicateName { .. } => ErrorCode::DuplicateName,
        CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
        CoreError::InsufficientPayment { .. } => ErrorCode::PaymentError,
        CoreError::CartClosed => ErrorCode::CartError,
        CoreError::MalformedLineItems { .. } => ErrorCode::MalformedData,
        CoreError::InvalidQuantity { .. } | CoreError::Validation(_) => ErrorCode::ValidationError,
        // A rejected batch reports the code of the row that sank it.
        CoreError::BatchRowRejected { source, .. } => core_code(source),
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => CliError::from(e),
            DbError::NotFound { entity, id } => {
                CliError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
            }
            DbError::UniqueViolation { field, value } => CliError::new(
                ErrorCode::DuplicateName,
                format!("{field} '{value}' already exists"),
            ),
            DbError::CorruptValue { .. } => {
                tracing::error!("Corrupt stored value: {}", err);
                CliError::new(ErrorCode::MalformedData, err.to_string())
            }
            other => {
                tracing::error!("Database error: {}", other);
                CliError::new(ErrorCode::DatabaseError, other.to_string())
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::validation(format!("Invalid JSON: {err}"))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_core::Money;

    #[test]
    fn test_stock_and_payment_codes() {
        let stock = CliError::from(CoreError::InsufficientStock {
            name: "Hat".to_string(),
            available: 2,
            requested: 3,
        });
        assert_eq!(stock.code, ErrorCode::InsufficientStock);
        assert_eq!(stock.exit_code(), 4);

        let payment = CliError::from(DbError::Domain(CoreError::InsufficientPayment {
            total: Money::from_cents(3000),
            tendered: Money::from_cents(2000),
        }));
        assert_eq!(payment.code, ErrorCode::PaymentError);
    }

    #[test]
    fn test_batch_row_keeps_inner_code() {
        let err = CoreError::DuplicateName {
            name: "Hat".to_string(),
        }
        .at_batch_row(2);
        let cli = CliError::from(err);
        assert_eq!(cli.code, ErrorCode::DuplicateName);
        assert!(cli.message.contains("row 2"));
    }

    #[test]
    fn test_validation_exit_code() {
        let err = CliError::from(ValidationError::Required {
            field: "name".to_string(),
        });
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_json_shape() {
        let err = CliError::new(ErrorCode::NotFound, "Item not found: 9");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"Item not found: 9"}"#);
    }
}
