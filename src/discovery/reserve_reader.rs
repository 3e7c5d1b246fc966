use crate::core::{Pool, PoolReserves, PoolStats, ReserveError, SwapResult, Token, TokenRegistry};
use alloy::primitives::{Address, U256};
use futures::future::join_all;
use log::{debug, warn};

/// Reads live pool state.
///
/// Implementations perform exactly one read per call and never retry; the
/// caller owns the retry policy.
#[async_trait::async_trait]
pub trait ReserveReader: Send + Sync {
    async fn read_stats(&self, pool: &Pool) -> Result<PoolStats, ReserveError>;

    async fn read_reserves(&self, pool: &Pool) -> Result<PoolReserves, ReserveError> {
        Ok(self.read_stats(pool).await?.reserves)
    }
}

/// The pool contract's own pricing function
#[async_trait::async_trait]
pub trait AmountOutSource: Send + Sync {
    async fn amount_out(
        &self,
        pool: &Pool,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256, ReserveError>;
}

/// Native and ERC-20 balances of an account
#[async_trait::async_trait]
pub trait BalanceSource: Send + Sync {
    async fn balance_of(&self, token: &Token, account: Address) -> SwapResult<U256>;
}

/// Reads stats for every registered pool concurrently. A failing pool does
/// not fail the others.
pub async fn read_all_stats(
    reader: &dyn ReserveReader,
    registry: &TokenRegistry,
) -> Vec<(Pool, Result<PoolStats, ReserveError>)> {
    let pools: Vec<Pool> = registry.pools().cloned().collect();
    let results = join_all(pools.iter().map(|pool| reader.read_stats(pool))).await;

    pools
        .into_iter()
        .zip(results)
        .map(|(pool, result)| {
            match &result {
                Ok(stats) => debug!(
                    "{}: reserves {} / {}",
                    pool.label(),
                    stats.reserves.hub,
                    stats.reserves.other
                ),
                Err(e) => warn!("Failed to read {}: {}", pool.label(), e),
            }
            (pool, result)
        })
        .collect()
}

/// Reads balances for every registered token concurrently
pub async fn read_all_balances(
    source: &dyn BalanceSource,
    registry: &TokenRegistry,
    account: Address,
) -> Vec<(Token, SwapResult<U256>)> {
    let tokens: Vec<Token> = registry.tokens().cloned().collect();
    let results = join_all(tokens.iter().map(|token| source.balance_of(token, account))).await;
    tokens.into_iter().zip(results).collect()
}
