//! # Register Error Type
//!
//! Unified error type for register operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Caderno                             │
//! │                                                                         │
//! │  CoreError (business rules)  ─┐                                         │
//! │  DbError (storage)           ─┼──► RegisterError ──► ErrorPayload       │
//! │  PDF rendering failures      ─┘         │            { code, message }  │
//! │                                         │                               │
//! │                                         ▼                               │
//! │  The web layer serializes ErrorPayload for clients; the batch binary    │
//! │  prints RegisterError per unit.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use caderno_core::{CoreError, ValidationError};
use caderno_db::DbError;

/// Result alias for register operations.
pub type RegisterResult<T> = Result<T, RegisterError>;

// =============================================================================
// Register Error
// =============================================================================

/// Errors surfaced by the register services.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Business-rule violation from caderno-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure from caderno-db.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A requested report does not exist in a presentable form
    /// (e.g. a PDF for a day with zero sales).
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// PDF rendering failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl RegisterError {
    /// Creates a NotFound error.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        RegisterError::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RegisterError::Core(CoreError::ProductNotFound(_)) => ErrorCode::ProductNotFound,
            RegisterError::Core(CoreError::InsufficientStock { .. }) => {
                ErrorCode::InsufficientStock
            }
            RegisterError::Core(CoreError::InvalidMonth(_)) => ErrorCode::InvalidMonth,
            RegisterError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            RegisterError::Db(DbError::NotFound { .. }) => ErrorCode::NotFound,
            RegisterError::Db(DbError::Internal(_)) => ErrorCode::Internal,
            RegisterError::Db(_) => ErrorCode::DatabaseError,
            RegisterError::NotFound { .. } => ErrorCode::NotFound,
            RegisterError::Pdf(_) => ErrorCode::PdfError,
        }
    }

    /// Serializable payload for the web layer.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<ValidationError> for RegisterError {
    fn from(err: ValidationError) -> Self {
        RegisterError::Core(CoreError::Validation(err))
    }
}

// =============================================================================
// Error Payload
// =============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced product does not exist
    ProductNotFound,

    /// Business-rule violation: not enough stock
    InsufficientStock,

    /// Input validation failed (400)
    ValidationError,

    /// Month outside 1-12
    InvalidMonth,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// Unexpected internal failure (500)
    Internal,

    /// PDF rendering failed
    PdfError,
}

/// What a failing operation serializes for clients.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "estoque insuficiente para 'parafuso': disponível 3, solicitado 10"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
