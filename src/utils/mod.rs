use crate::core::{SwapError, SwapResult};
use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;

/// Parse a human-readable token amount ("1.5") into 18-decimal base units
pub fn parse_amount(input: &str) -> SwapResult<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SwapError::InvalidAmount("amount is empty".to_string()));
    }
    if trimmed.starts_with('-') {
        return Err(SwapError::InvalidAmount(format!(
            "amount must be positive: {}",
            trimmed
        )));
    }

    let amount = parse_ether(trimmed)
        .map_err(|e| SwapError::InvalidAmount(format!("{}: {}", trimmed, e)))?;
    if amount.is_zero() {
        return Err(SwapError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

/// Format 18-decimal base units with at most `max_decimals` fractional digits,
/// trailing zeros removed
pub fn format_amount(amount: U256, max_decimals: usize) -> String {
    let full = format_ether(amount);
    let (whole, fraction) = match full.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (full.as_str(), ""),
    };

    let fraction: String = fraction.chars().take(max_decimals).collect();
    let fraction = fraction.trim_end_matches('0');

    let whole = format_number_str(whole);
    if fraction.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Percentage with two decimals, e.g. "0.25%"
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

/// `0x1234…abcd`
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

/// Format large numbers with thousands separators
pub fn format_number(n: u64) -> String {
    format_number_str(&n.to_string())
}

fn format_number_str(digits: &str) -> String {
    let mut result = String::new();
    let mut count = 0;

    for ch in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1").unwrap(), U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(
            parse_amount(" 0.5 ").unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
        assert_eq!(parse_amount("0.000000000000000001").unwrap(), U256::from(1u64));

        assert!(parse_amount("").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_format_amount() {
        let one = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_amount(one, 6), "1");
        assert_eq!(format_amount(one * U256::from(1_234_567u64), 2), "1,234,567");
        assert_eq!(
            format_amount(U256::from(498_003_490_519_951_608_246u128), 4),
            "498.0034"
        );
        assert_eq!(format_amount(U256::from(1u64), 6), "0");
        assert_eq!(format_amount(U256::ZERO, 6), "0");
    }

    #[test]
    fn test_format_percent_and_address() {
        assert_eq!(format_percent(dec!(0.0999000999)), "0.10%");
        assert_eq!(format_percent(dec!(15)), "15.00%");

        let short = short_address(&Address::repeat_byte(0xab));
        assert!(short.starts_with("0x"));
        assert_eq!(short.chars().count(), 11);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567890), "1,234,567,890");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(0), "0");
    }
}
