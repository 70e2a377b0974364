//! Amount parsing.

use alloy::primitives::U256;
use thiserror::Error;

/// Why an amount string could not be scaled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Amount cannot be empty")]
    Empty,

    #[error("Amount cannot be negative")]
    Negative,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount does not fit in uint256")]
    Overflow,
}

/// Parse a human-readable decimal amount into the smallest unit.
///
/// Accepts `"10"`, `"1.5"`, `".5"` and `"2."`. Fractional digits beyond
/// `decimals` are rounded half-up. Surrounding whitespace is ignored.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err(AmountError::Empty);
    }
    if amount.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(integer) || !is_digits(fraction) || (integer.is_empty() && fraction.is_empty())
    {
        return Err(AmountError::Invalid(amount.to_string()));
    }

    let decimals = decimals as usize;
    let (kept, round_up) = if fraction.len() > decimals {
        (&fraction[..decimals], fraction.as_bytes()[decimals] >= b'5')
    } else {
        (fraction, false)
    };

    let scale = U256::from(10u8).checked_pow(U256::from(decimals)).ok_or(AmountError::Overflow)?;

    let integer_value = digits_to_u256(integer)?;
    let fraction_value = digits_to_u256(kept)?
        .checked_mul(U256::from(10u8).pow(U256::from(decimals - kept.len())))
        .ok_or(AmountError::Overflow)?;

    integer_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_value))
        .and_then(|v| if round_up { v.checked_add(U256::from(1u8)) } else { Some(v) })
        .ok_or(AmountError::Overflow)
}

fn digits_to_u256(digits: &str) -> Result<U256, AmountError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| AmountError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(s: &str) -> U256 {
        U256::from_str_radix(s, 10).unwrap()
    }

    #[test]
    fn test_parse_units_whole_and_fractional() {
        assert_eq!(parse_units("10", 18).unwrap(), wei("10000000000000000000"));
        assert_eq!(parse_units("1.5", 18).unwrap(), wei("1500000000000000000"));
        assert_eq!(parse_units(".5", 18).unwrap(), wei("500000000000000000"));
        assert_eq!(parse_units("2.", 18).unwrap(), wei("2000000000000000000"));
        assert_eq!(parse_units("0", 18).unwrap(), U256::ZERO);
        assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_units("100", 0).unwrap(), U256::from(100u64));
    }

    #[test]
    fn test_parse_units_trims_whitespace() {
        assert_eq!(parse_units("  1.5 ", 18).unwrap(), wei("1500000000000000000"));
    }

    #[test]
    fn test_parse_units_rounds_excess_digits() {
        assert_eq!(parse_units("1.1234564", 6).unwrap(), U256::from(1_123_456u64));
        assert_eq!(parse_units("1.1234565", 6).unwrap(), U256::from(1_123_457u64));
        assert_eq!(parse_units("0.9999999", 6).unwrap(), U256::from(1_000_000u64));
        assert_eq!(parse_units("1.5", 0).unwrap(), U256::from(2u64));
        assert_eq!(parse_units("1.4", 0).unwrap(), U256::from(1u64));
    }

    #[test]
    fn test_parse_units_rejects_garbage() {
        assert_eq!(parse_units("", 18), Err(AmountError::Empty));
        assert_eq!(parse_units("   ", 18), Err(AmountError::Empty));
        assert_eq!(parse_units("-1", 18), Err(AmountError::Negative));
        assert!(matches!(parse_units("abc", 18), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_units("1.2.3", 18), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_units("1.5abc", 18), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_units(".", 18), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_units("1e18", 18), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_units("+1", 18), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_units("1 000", 18), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_parse_units_overflow() {
        let huge = "1".repeat(70);
        assert_eq!(parse_units(&huge, 18), Err(AmountError::Overflow));
        assert_eq!(parse_units("1", 78), Err(AmountError::Overflow));
    }
}
