//! # Input Validation
//!
//! Shape checks on inputs before they reach the ledger. Stock availability
//! is NOT checked here: that requires the catalog and belongs inside the
//! finalizer's transaction.

use crate::error::ValidationError;
use crate::types::SaleLine;
use crate::MAX_SALE_LINES;

/// Maximum product name length, matching the catalog column.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Validates the requested lines of a sale: non-empty, bounded, each line
/// with a positive quantity.
pub fn validate_sale_lines(lines: &[SaleLine]) -> Result<(), ValidationError> {
    if lines.is_empty() {
        return Err(ValidationError::Required { field: "items" });
    }
    if lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items",
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(ValidationError::MustBePositive { field: "quantity" });
        }
    }
    Ok(())
}

/// Validates a catalog product name: non-blank, bounded.
pub fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    if trimmed.len() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::OutOfRange {
            field: "name",
            min: 1,
            max: MAX_PRODUCT_NAME_LEN as i64,
        });
    }
    Ok(())
}

/// Validates a catalog price in centavos: zero is allowed (giveaways),
/// negative is not.
pub fn validate_price(price_cents: i64) -> Result<(), ValidationError> {
    if price_cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price_cents",
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64) -> SaleLine {
        SaleLine {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_empty_sale_rejected() {
        assert_eq!(
            validate_sale_lines(&[]),
            Err(ValidationError::Required { field: "items" })
        );
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert!(validate_sale_lines(&[line(1, 0)]).is_err());
        assert!(validate_sale_lines(&[line(1, -3)]).is_err());
        assert!(validate_sale_lines(&[line(1, 2), line(2, 0)]).is_err());
    }

    #[test]
    fn test_too_many_lines_rejected() {
        let lines: Vec<SaleLine> = (0..=MAX_SALE_LINES as i64).map(|i| line(i, 1)).collect();
        assert!(validate_sale_lines(&lines).is_err());
    }

    #[test]
    fn test_valid_lines_pass() {
        assert!(validate_sale_lines(&[line(1, 15), line(2, 2)]).is_ok());
    }

    #[test]
    fn test_product_name() {
        assert!(validate_product_name("parafuso").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(15).is_ok());
        assert!(validate_price(-1).is_err());
    }
}
