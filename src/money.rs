//! Money Conversion Module
//!
//! Currency amounts are `rust_decimal::Decimal` end to end. Internal
//! computation keeps full precision so that summing many departments for
//! reconciliation does not compound rounding error; rounding happens only at
//! the presentation boundary.
//!
//! ## Usage
//! ```rust
//! use condoledger::money::{parse_amount, format_amount};
//!
//! // Admin records "1500.50" as the monthly total
//! let total = parse_amount("1500.50")?;
//!
//! // Display an owed amount to the client
//! let display = format_amount(total);
//! assert_eq!(display, "1500.50");
//! # Ok::<(), condoledger::money::MoneyError>(())
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Decimal places shown for currency values at the presentation boundary.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Decimal places a share total is rounded to for display and the
/// under-allocation warning. The authoritative overflow comparison never
/// uses this rounding.
pub const SHARE_DISPLAY_DECIMALS: u32 = 3;

/// Money conversion errors
#[derive(Debug, Clone, Error)]
pub enum MoneyError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Amount must not be negative")]
    NegativeAmount,

    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },
}

/// Parse a client-provided currency string into a `Decimal`.
///
/// # Errors
/// * `InvalidFormat` - empty or non-numeric input
/// * `NegativeAmount` - amounts are non-negative by definition
/// * `PrecisionOverflow` - more than [`CURRENCY_DECIMALS`] decimal places
pub fn parse_amount(amount_str: &str) -> Result<Decimal, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    let amount: Decimal = amount_str
        .parse()
        .map_err(|_| MoneyError::InvalidFormat(amount_str.to_string()))?;

    validate_amount(amount)?;
    Ok(amount)
}

/// Validate a currency amount arriving as a `Decimal` (the API boundary
/// deserializes JSON numbers into `Decimal` directly).
pub fn validate_amount(amount: Decimal) -> Result<Decimal, MoneyError> {
    if amount.is_sign_negative() {
        return Err(MoneyError::NegativeAmount);
    }

    // Reject sub-cent input. Computed values may carry more precision;
    // this check applies to user input only.
    let normalized = amount.normalize();
    if normalized.scale() > CURRENCY_DECIMALS {
        return Err(MoneyError::PrecisionOverflow {
            provided: normalized.scale(),
            max: CURRENCY_DECIMALS,
        });
    }

    Ok(amount)
}

/// Format a currency value for display, rounded to two decimals.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.prec$}", value, prec = CURRENCY_DECIMALS as usize)
}

/// Round a currency value to two decimals for presentation. Internal
/// arithmetic never goes through this.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp(CURRENCY_DECIMALS)
}

/// Round a share sum to three decimals for display.
pub fn round_share_total(value: Decimal) -> Decimal {
    value.round_dp(SHARE_DISPLAY_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_amount_variations() {
        assert_eq!(parse_amount("1000").unwrap(), Decimal::from(1000));
        assert_eq!(parse_amount("1500.50").unwrap(), Decimal::new(150050, 2));
        assert_eq!(parse_amount(" 0.99 ").unwrap(), Decimal::new(99, 2));

        // Zero is a valid expense total
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("0.00").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_invalid_formats() {
        assert!(matches!(
            parse_amount(""),
            Err(MoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_amount("1,000.00"),
            Err(MoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_amount("abc"),
            Err(MoneyError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        assert!(matches!(
            parse_amount("-1.00"),
            Err(MoneyError::NegativeAmount)
        ));
    }

    #[test]
    fn test_parse_amount_precision_limit() {
        assert!(parse_amount("1.99").is_ok());

        let res = parse_amount("1.999");
        assert!(matches!(
            res,
            Err(MoneyError::PrecisionOverflow {
                provided: 3,
                max: 2
            })
        ));
    }

    #[test]
    fn test_validate_amount_ignores_trailing_zeros() {
        // 1.2300 has scale 4 but normalizes to 1.23
        let d = Decimal::from_str("1.2300").unwrap();
        assert!(validate_amount(d).is_ok());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(400)), "400.00");
        assert_eq!(format_amount(Decimal::new(199_9, 1)), "199.90");
        // Full-precision computed value truncates only at display time
        let owed = Decimal::new(333, 3) * Decimal::from(1000);
        assert_eq!(format_amount(owed), "333.00");
    }

    #[test]
    fn test_round_currency() {
        let owed = Decimal::new(3335, 4) * Decimal::from(1000); // 333.5
        assert_eq!(round_currency(owed), Decimal::new(3335, 1));
        assert_eq!(round_currency(Decimal::new(10_004, 4)), Decimal::ONE);
    }

    #[test]
    fn test_round_share_total() {
        assert_eq!(
            round_share_total(Decimal::from_str("0.9996").unwrap()),
            Decimal::from_str("1.000").unwrap()
        );
        assert_eq!(
            round_share_total(Decimal::from_str("0.99949").unwrap()),
            Decimal::from_str("0.999").unwrap()
        );
    }
}
