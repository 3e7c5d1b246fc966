use crate::core::{FeeRate, QuoteError, SlippageTolerance};
use alloy::primitives::U256;
use log::debug;
use rust_decimal::Decimal;

/// Decimal places kept for percentages
const PERCENT_SCALE: u32 = 12;
/// Decimal places kept for exchange rates
const RATE_SCALE: u32 = 18;

/// Constant product (x * y = k) quote math with the fee taken from the input.
///
/// Everything here is pure integer arithmetic on 18-decimal base units, so a
/// quote computed locally matches what the pool contract computes.
#[derive(Debug, Clone, Copy)]
pub struct AmmQuoteCalculator {
    fee: FeeRate,
}

impl AmmQuoteCalculator {
    pub fn new() -> Self {
        Self::with_fee(FeeRate::PROTOCOL)
    }

    pub fn with_fee(fee: FeeRate) -> Self {
        Self { fee }
    }

    pub fn fee(&self) -> FeeRate {
        self.fee
    }

    /// Output amount for `amount_in` against the given reserves.
    ///
    /// Returns zero when there is nothing to trade or no liquidity on either
    /// side. Zero is a signal, not a valid trade size.
    pub fn quote_output(
        &self,
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
    ) -> Result<U256, QuoteError> {
        quote_output(amount_in, reserve_in, reserve_out, self.fee)
    }

    pub fn fee_amount(&self, amount_in: U256) -> U256 {
        fee_amount(amount_in, self.fee)
    }
}

impl Default for AmmQuoteCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// `amount_out = (amount_in * (1 - fee) * reserve_out) / (reserve_in + amount_in * (1 - fee))`
pub fn quote_output(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: FeeRate,
) -> Result<U256, QuoteError> {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::ZERO);
    }

    let keep = U256::from(fee.denominator - fee.numerator);
    let denominator_scale = U256::from(fee.denominator);

    let amount_in_with_fee = amount_in
        .checked_mul(keep)
        .ok_or(QuoteError::MathOverflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(QuoteError::MathOverflow)?;
    let denominator = reserve_in
        .checked_mul(denominator_scale)
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or(QuoteError::MathOverflow)?;

    let amount_out = numerator / denominator;

    debug!(
        "AMM quote: amount_in={}, reserve_in={}, reserve_out={}, amount_out={}",
        amount_in, reserve_in, reserve_out, amount_out
    );

    Ok(amount_out)
}

pub fn fee_amount(amount_in: U256, fee: FeeRate) -> U256 {
    amount_in
        .checked_mul(U256::from(fee.numerator))
        .map(|scaled| scaled / U256::from(fee.denominator))
        .unwrap_or_else(|| amount_in / U256::from(fee.denominator) * U256::from(fee.numerator))
}

/// Share of the input-side pool depth this trade consumes, in percent:
/// `amount_in / (reserve_in + amount_in) * 100`.
pub fn price_impact(amount_in: U256, reserve_in: U256) -> Decimal {
    let depth = reserve_in.saturating_add(amount_in);
    ratio_to_decimal(amount_in.saturating_mul(U256::from(100u64)), depth, PERCENT_SCALE)
        .unwrap_or(Decimal::ZERO)
}

/// Combines per-hop impacts multiplicatively, `1 - Π(1 - impact/100)`, then caps the result.
pub fn compound_impact(impacts: &[Decimal], cap: Decimal) -> Decimal {
    let keep = impacts
        .iter()
        .map(|impact| Decimal::ONE - *impact / Decimal::ONE_HUNDRED)
        .fold(Decimal::ONE, |acc, hop| acc * hop);

    let aggregate = (Decimal::ONE - keep) * Decimal::ONE_HUNDRED;
    aggregate.max(Decimal::ZERO).min(cap)
}

/// `amount_out * (1 - slippage/100)`, rounded down
pub fn minimum_received(amount_out: U256, slippage: SlippageTolerance) -> U256 {
    let keep = U256::from(slippage.keep_ppm());
    let million = U256::from(1_000_000u64);
    amount_out
        .checked_mul(keep)
        .map(|scaled| scaled / million)
        .unwrap_or_else(|| amount_out / million * keep)
}

/// Output tokens received per input token
pub fn exchange_rate(amount_in: U256, amount_out: U256) -> Decimal {
    ratio_to_decimal(amount_out, amount_in, RATE_SCALE).unwrap_or(Decimal::ZERO)
}

/// `numerator / denominator` as a Decimal with up to `scale` places.
///
/// Precision is dropped as needed to fit Decimal's 96-bit mantissa.
pub fn ratio_to_decimal(numerator: U256, denominator: U256, scale: u32) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }

    let factor = U256::from(10u64).pow(U256::from(scale));
    let (mut n, mut d) = (numerator, denominator);
    while n.checked_mul(factor).is_none() {
        n >>= 1usize;
        d >>= 1usize;
        if d.is_zero() {
            return None;
        }
    }

    let mut quotient = n * factor / d;
    let mut scale = scale;
    loop {
        if let Some(mantissa) = u128::try_from(quotient)
            .ok()
            .and_then(|q| i128::try_from(q).ok())
        {
            if let Ok(value) = Decimal::try_from_i128_with_scale(mantissa, scale) {
                return Some(value.normalize());
            }
        }
        if scale == 0 {
            return None;
        }
        quotient /= U256::from(10u64);
        scale -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_reference_scenario() {
        let calculator = AmmQuoteCalculator::new();

        // 1 hub into (1000 hub, 500000 other): 498500 / 1000.997
        let amount_out = calculator
            .quote_output(ether(1), ether(1_000), ether(500_000))
            .unwrap();
        assert_eq!(amount_out, U256::from(498_003_490_519_951_608_246u128));

        let rate = exchange_rate(ether(1), amount_out);
        assert!(rate > dec!(498.00) && rate < dec!(498.01));
    }

    #[test]
    fn test_degenerate_inputs_yield_zero() {
        let calculator = AmmQuoteCalculator::new();

        assert_eq!(calculator.quote_output(U256::ZERO, ether(10), ether(10)).unwrap(), U256::ZERO);
        assert_eq!(calculator.quote_output(ether(1), U256::ZERO, ether(10)).unwrap(), U256::ZERO);
        assert_eq!(calculator.quote_output(ether(1), ether(10), U256::ZERO).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_output_is_monotonic_and_sublinear() {
        let calculator = AmmQuoteCalculator::new();
        let reserves = [
            (ether(1_000), ether(500_000)),
            (ether(10), ether(10)),
            (U256::from(1_000_000u64), U256::from(3u64) * ether(1)),
        ];
        let amounts = [U256::from(10u64).pow(U256::from(15u64)), ether(1), ether(5), ether(250)];

        for (reserve_in, reserve_out) in reserves {
            let mut previous = U256::ZERO;
            for amount in amounts {
                let single = calculator.quote_output(amount, reserve_in, reserve_out).unwrap();
                let double = calculator
                    .quote_output(amount * U256::from(2u64), reserve_in, reserve_out)
                    .unwrap();

                assert!(single >= previous, "not monotonic at {}", amount);
                assert!(double < single * U256::from(2u64), "not sub-linear at {}", amount);
                previous = single;
            }
        }
    }

    #[test]
    fn test_round_trip_loses_value() {
        let calculator = AmmQuoteCalculator::new();
        let (hub, other) = (ether(1_000), ether(500_000));

        for amount in [U256::from(1u64), ether(1), ether(100), ether(5_000)] {
            let bought = calculator.quote_output(amount, hub, other).unwrap();
            let hub_after = hub + amount;
            let other_after = other - bought;
            let sold = calculator.quote_output(bought, other_after, hub_after).unwrap();
            assert!(sold < amount);
        }
    }

    #[test]
    fn test_fee_amount() {
        assert_eq!(fee_amount(U256::from(1_000u64), FeeRate::PROTOCOL), U256::from(3u64));
        assert_eq!(fee_amount(ether(1), FeeRate::PROTOCOL), U256::from(3_000_000_000_000_000u64));
    }

    #[test]
    fn test_price_impact_is_pool_depth_share() {
        assert_eq!(price_impact(ether(1), ether(1_000)), dec!(0.0999000999));
        assert_eq!(price_impact(ether(1_000), ether(1_000)), dec!(50));
        assert_eq!(price_impact(U256::ZERO, ether(1_000)), Decimal::ZERO);
        assert_eq!(price_impact(U256::ZERO, U256::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_compound_impact() {
        assert_eq!(compound_impact(&[dec!(1), dec!(1)], dec!(15)), dec!(1.99));
        assert_eq!(compound_impact(&[dec!(2.5)], dec!(15)), dec!(2.5));
        assert_eq!(compound_impact(&[dec!(40), dec!(50)], dec!(15)), dec!(15));
        assert_eq!(compound_impact(&[], dec!(15)), Decimal::ZERO);
    }

    #[test]
    fn test_minimum_received() {
        let slippage = SlippageTolerance::new(dec!(0.5));
        assert_eq!(minimum_received(ether(100), slippage), ether(995) / U256::from(10u64));
        assert_eq!(minimum_received(U256::from(1_000u64), slippage), U256::from(995u64));

        let tight = SlippageTolerance::new(dec!(0.1));
        assert_eq!(minimum_received(U256::from(1_000u64), tight), U256::from(999u64));
    }

    #[test]
    fn test_ratio_to_decimal() {
        assert_eq!(ratio_to_decimal(U256::from(1u64), U256::from(4u64), 6), Some(dec!(0.25)));
        assert_eq!(ratio_to_decimal(U256::from(1u64), U256::ZERO, 6), None);
        assert_eq!(ratio_to_decimal(U256::MAX, U256::MAX, 18), Some(dec!(1)));

        // Too large for 18 places, falls back to fewer
        let huge = ratio_to_decimal(ether(10_000_000_000), U256::from(1u64), 18).unwrap();
        assert_eq!(huge, Decimal::from_i128_with_scale(10i128.pow(28), 0));

        // Beyond Decimal's range entirely
        assert_eq!(ratio_to_decimal(ether(1_000_000_000_000), U256::from(1u64), 18), None);
    }
}
