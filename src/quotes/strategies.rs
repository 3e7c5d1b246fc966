use crate::core::{Hop, PoolReserves, QuoteError, StrategyKind};
use crate::discovery::AmountOutSource;
use crate::quotes::{AmmQuoteCalculator, QuoteStrategy, StrategyError};
use alloy::primitives::U256;
use std::sync::Arc;

/// Prices a hop from the reserve snapshot with the constant-product formula
pub struct LocalAmmStrategy {
    calculator: AmmQuoteCalculator,
}

impl LocalAmmStrategy {
    pub fn new(calculator: AmmQuoteCalculator) -> Self {
        Self { calculator }
    }
}

#[async_trait::async_trait]
impl QuoteStrategy for LocalAmmStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LocalAmm
    }

    async fn amount_out(
        &self,
        hop: &Hop,
        reserves: &PoolReserves,
        amount_in: U256,
    ) -> Result<U256, StrategyError> {
        let (reserve_in, reserve_out) = hop.orient(reserves);
        self.calculator
            .quote_output(amount_in, reserve_in, reserve_out)
            .map_err(|e| match e {
                QuoteError::MathOverflow => StrategyError::Overflow,
                other => StrategyError::Unavailable(other.to_string()),
            })
    }
}

/// Asks the pool contract itself via `getAmountOut`
pub struct OnchainAmountOutStrategy {
    source: Arc<dyn AmountOutSource>,
}

impl OnchainAmountOutStrategy {
    pub fn new(source: Arc<dyn AmountOutSource>) -> Self {
        Self { source }
    }
}

#[async_trait::async_trait]
impl QuoteStrategy for OnchainAmountOutStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OnchainAmountOut
    }

    async fn amount_out(
        &self,
        hop: &Hop,
        _reserves: &PoolReserves,
        amount_in: U256,
    ) -> Result<U256, StrategyError> {
        self.source
            .amount_out(&hop.pool, hop.token_in_address(), amount_in)
            .await
            .map_err(|e| StrategyError::Unavailable(e.to_string()))
    }
}
