pub mod amm_calculator;
pub mod strategies;

use crate::core::{FailureCause, Hop, HopQuote, PoolReserves, StrategyFailure, StrategyKind};
use alloy::primitives::U256;
use log::debug;
use std::sync::Arc;
use thiserror::Error;

pub use amm_calculator::AmmQuoteCalculator;
pub use strategies::{LocalAmmStrategy, OnchainAmountOutStrategy};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("{0}")]
    Unavailable(String),
}

impl StrategyError {
    fn cause(&self) -> FailureCause {
        match self {
            StrategyError::Overflow => FailureCause::Overflow,
            StrategyError::Unavailable(_) => FailureCause::Unavailable,
        }
    }
}

/// One way of pricing a single hop
#[async_trait::async_trait]
pub trait QuoteStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn amount_out(
        &self,
        hop: &Hop,
        reserves: &PoolReserves,
        amount_in: U256,
    ) -> Result<U256, StrategyError>;
}

/// Result of running the chain on one hop
#[derive(Debug, Clone)]
pub struct HopOutcome {
    pub quote: Option<HopQuote>,
    pub failures: Vec<StrategyFailure>,
}

impl HopOutcome {
    /// At least one strategy ran and priced the hop at zero
    pub fn saw_no_liquidity(&self) -> bool {
        self.saw(FailureCause::NoLiquidity)
    }

    pub fn saw(&self, cause: FailureCause) -> bool {
        self.failures.iter().any(|f| f.cause == cause)
    }
}

/// Ordered list of quoting strategies.
///
/// Strategies are tried in order until one returns a positive output. A zero
/// output or an error moves on to the next one; both are kept as diagnostics.
pub struct StrategyChain {
    strategies: Vec<Arc<dyn QuoteStrategy>>,
    calculator: AmmQuoteCalculator,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Arc<dyn QuoteStrategy>>) -> Self {
        Self {
            strategies,
            calculator: AmmQuoteCalculator::new(),
        }
    }

    /// Local constant-product math only
    pub fn local() -> Self {
        let calculator = AmmQuoteCalculator::new();
        Self::new(vec![Arc::new(LocalAmmStrategy::new(calculator))])
    }

    /// Local math first, then the pool's own `getAmountOut`
    pub fn with_onchain_fallback(source: Arc<dyn crate::discovery::AmountOutSource>) -> Self {
        let calculator = AmmQuoteCalculator::new();
        Self::new(vec![
            Arc::new(LocalAmmStrategy::new(calculator)),
            Arc::new(OnchainAmountOutStrategy::new(source)),
        ])
    }

    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    pub async fn quote_hop(
        &self,
        index: usize,
        hop: &Hop,
        reserves: &PoolReserves,
        amount_in: U256,
    ) -> HopOutcome {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            let kind = strategy.kind();
            match strategy.amount_out(hop, reserves, amount_in).await {
                Ok(amount_out) if !amount_out.is_zero() => {
                    debug!(
                        "Hop {} {}→{} priced by {}: {} -> {}",
                        index, hop.token_in, hop.token_out, kind, amount_in, amount_out
                    );
                    let (reserve_in, _) = hop.orient(reserves);
                    let quote = HopQuote {
                        pool: hop.pool.address,
                        token_in: hop.token_in,
                        token_out: hop.token_out,
                        amount_in,
                        amount_out,
                        fee: self.calculator.fee_amount(amount_in),
                        price_impact: amm_calculator::price_impact(amount_in, reserve_in),
                        strategy: kind,
                    };
                    return HopOutcome {
                        quote: Some(quote),
                        failures,
                    };
                }
                Ok(_) => {
                    debug!("Hop {} strategy {} returned zero output", index, kind);
                    failures.push(StrategyFailure {
                        hop: index,
                        strategy: kind,
                        reason: "zero output".to_string(),
                        cause: FailureCause::NoLiquidity,
                    });
                }
                Err(e) => {
                    debug!("Hop {} strategy {} failed: {}", index, kind, e);
                    failures.push(StrategyFailure {
                        hop: index,
                        strategy: kind,
                        reason: e.to_string(),
                        cause: e.cause(),
                    });
                }
            }
        }

        HopOutcome {
            quote: None,
            failures,
        }
    }
}
