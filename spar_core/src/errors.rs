//! # Error Types
//!
//! Structured error types for spar_core. A chart or thickness-band lookup that
//! leaves its tabulated range is an [`CalcError::OutOfRange`] error, carried
//! through every margin computation as an ordinary `Err`. Only the report rows
//! turn it into a `NaN` cell plus a visible status.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(thickness_mm: f64) -> CalcResult<()> {
//!     if thickness_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "thickness_mm",
//!             thickness_mm.to_string(),
//!             "Thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_thickness(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for spar_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for sizing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A lookup fell outside the range a handbook chart or table covers
    #[error("Out of range: {quantity} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        quantity: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A breakpoint table is malformed (too short, unsorted, non-finite)
    #[error("Invalid table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    /// An input value is invalid (non-positive dimension, bad ordering, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON or CSV serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an OutOfRange error
    pub fn out_of_range(quantity: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        CalcError::OutOfRange {
            quantity: quantity.into(),
            value,
            min,
            max,
        }
    }

    /// Create an InvalidTable error
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidTable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for lookups outside a chart or table. These mark a margin as
    /// undefined instead of aborting a whole analysis.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, CalcError::OutOfRange { .. })
    }

    /// True for malformed model input or tables, which must stop an analysis
    /// before anything is computed.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidTable { .. } | CalcError::InvalidInput { .. } | CalcError::MissingField { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::OutOfRange { .. } => "OUT_OF_RANGE",
            CalcError::InvalidTable { .. } => "INVALID_TABLE",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

impl From<csv::Error> for CalcError {
    fn from(e: csv::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::out_of_range("panel aspect ratio", 14.2, 0.9, 12.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("OutOfRange"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("loads").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::invalid_table("k", "unsorted").error_code(), "INVALID_TABLE");
        assert_eq!(CalcError::out_of_range("b/t", 11.0, 0.1, 10.0).error_code(), "OUT_OF_RANGE");
    }

    #[test]
    fn test_error_classification() {
        assert!(CalcError::out_of_range("x", 0.0, 1.0, 2.0).is_domain_error());
        assert!(!CalcError::out_of_range("x", 0.0, 1.0, 2.0).is_configuration_error());
        assert!(CalcError::invalid_table("t", "r").is_configuration_error());
        assert!(CalcError::invalid_input("f", "v", "r").is_configuration_error());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::out_of_range("crippling abscissa", 12.5, 0.1, 10.0);
        assert_eq!(
            error.to_string(),
            "Out of range: crippling abscissa = 12.5 is outside [0.1, 10]"
        );
    }
}
