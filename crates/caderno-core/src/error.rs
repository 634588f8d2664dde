//! # Domain Error Types
//!
//! Typed errors for the pure business logic. Outer layers (`caderno-db`,
//! `caderno-register`) wrap these with their own error enums; nothing in
//! this crate panics on bad input.

use thiserror::Error;

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Core Errors
// =============================================================================

/// Business-rule violations.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A referenced product does not exist in the catalog.
    #[error("produto não encontrado: id {0}")]
    ProductNotFound(i64),

    /// A sale line asked for more units than the product has on hand.
    #[error("estoque insuficiente para '{product}': disponível {available}, solicitado {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Month outside 1-12.
    #[error("mês inválido: {0}")]
    InvalidMonth(u32),

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Input validation failures, carrying the offending field name.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("campo obrigatório: {field}")]
    Required { field: &'static str },

    #[error("{field} deve ser maior que zero")]
    MustBePositive { field: &'static str },

    #[error("{field} fora do intervalo permitido ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("{field} inválido: {reason}")]
    InvalidFormat { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound(42);
        assert_eq!(err.to_string(), "produto não encontrado: id 42");

        let err = CoreError::InsufficientStock {
            product: "parafuso".to_string(),
            available: 3,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "estoque insuficiente para 'parafuso': disponível 3, solicitado 10"
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let err: CoreError = ValidationError::MustBePositive { field: "quantity" }.into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.to_string(), "quantity deve ser maior que zero");
    }
}
