//! # Error Types
//!
//! Structured error types for quote_core. Two families matter to callers:
//! bad user input (negative prices, blank names, out-of-range picks) and
//! storage problems (unreadable, unwritable or corrupt inventory file).
//! Neither is retried automatically; the presentation layer decides whether
//! to show an inline warning or stop.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn validate_quantity(quantity: f64) -> QuoteResult<()> {
//!     if quantity < 0.0 {
//!         return Err(QuoteError::invalid_input(
//!             "quantity",
//!             quantity.to_string(),
//!             "Quantity cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_quantity(-1.0).unwrap_err().is_input_error());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for inventory and estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// An input value is invalid (negative, blank, min > max, bad index)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The inventory file could not be read or written
    #[error("Storage unavailable: {operation} on '{path}' - {reason}")]
    StorageUnavailable {
        operation: String,
        path: String,
        reason: String,
    },

    /// The inventory file exists but does not hold a valid inventory document
    #[error("Corrupt inventory at '{path}': {reason}")]
    CorruptInventory { path: String, reason: String },

    /// A selection names a material the inventory does not contain
    #[error("Material not found: '{name}' in category '{category}'")]
    MaterialNotFound { category: String, name: String },

    /// The inventory is held by another advisory lock holder
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error outside the inventory file
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl QuoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a StorageUnavailable error
    pub fn storage(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        QuoteError::StorageUnavailable {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptInventory error
    pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::CorruptInventory {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(category: impl Into<String>, name: impl Into<String>) -> Self {
        QuoteError::MaterialNotFound {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        QuoteError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// True for errors caused by what the user typed or picked
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            QuoteError::InvalidInput { .. } | QuoteError::MaterialNotFound { .. }
        )
    }

    /// True for errors caused by the environment around the inventory file
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            QuoteError::StorageUnavailable { .. }
                | QuoteError::CorruptInventory { .. }
                | QuoteError::FileLocked { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            QuoteError::CorruptInventory { .. } => "CORRUPT_INVENTORY",
            QuoteError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            QuoteError::FileLocked { .. } => "FILE_LOCKED",
            QuoteError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }
}

/// Reject negative and non-finite amounts. Never clamps.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> QuoteResult<f64> {
    if !value.is_finite() {
        return Err(QuoteError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(QuoteError::invalid_input(
            field,
            value.to_string(),
            "Value cannot be negative",
        ));
    }
    Ok(value)
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::Serialization {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = QuoteError::invalid_input("price", "-5", "Price cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: QuoteError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            QuoteError::material_not_found("knob types", "Brass").error_code(),
            "MATERIAL_NOT_FOUND"
        );
        assert_eq!(
            QuoteError::storage("read", "inventory.json", "permission denied").error_code(),
            "STORAGE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(QuoteError::invalid_input("name", "", "blank").is_input_error());
        assert!(!QuoteError::invalid_input("name", "", "blank").is_storage_error());
        assert!(QuoteError::corrupt("inventory.json", "EOF").is_storage_error());
        assert!(QuoteError::file_locked("inventory.json", "ana", "now").is_storage_error());
    }

    #[test]
    fn test_display_includes_context() {
        let err = QuoteError::material_not_found("handle types", "Steel Bar");
        assert_eq!(
            err.to_string(),
            "Material not found: 'Steel Bar' in category 'handle types'"
        );
    }
}
