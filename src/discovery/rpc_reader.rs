use crate::core::abi::{IHubPool, IERC20};
use crate::core::{Pool, PoolReserves, PoolStats, ReserveError, SwapError, SwapResult, Token};
use crate::discovery::{AmountOutSource, BalanceSource, ReserveReader};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;
use chrono::Utc;
use log::debug;
use std::future::IntoFuture;
use std::time::Duration;

/// Pool reads over JSON-RPC.
///
/// Each call is a single attempt bounded by the configured timeout.
#[derive(Clone)]
pub struct RpcPoolReader {
    provider: DynProvider,
    timeout: Duration,
}

impl RpcPoolReader {
    pub fn connect(rpc_url: &str, timeout_secs: u64) -> SwapResult<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|e| SwapError::ConfigError(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self::new(provider, timeout_secs))
    }

    pub fn new(provider: DynProvider, timeout_secs: u64) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub async fn chain_id(&self) -> SwapResult<u64> {
        match tokio::time::timeout(self.timeout, self.provider.get_chain_id()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(SwapError::Timeout(self.timeout.as_secs())),
        }
    }

    async fn bounded<T, E, F>(&self, pool: Address, fut: F) -> Result<T, ReserveError>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ReserveError::ReserveUnavailable {
                pool,
                reason: e.to_string(),
            }),
            Err(_) => Err(ReserveError::ReserveUnavailable {
                pool,
                reason: format!("timed out after {}s", self.timeout.as_secs()),
            }),
        }
    }

    async fn ensure_deployed(&self, pool: &Pool) -> Result<(), ReserveError> {
        let code = self
            .bounded(pool.address, self.provider.get_code_at(pool.address))
            .await?;
        if code.is_empty() {
            return Err(ReserveError::PoolNotFound(pool.address));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReserveReader for RpcPoolReader {
    async fn read_stats(&self, pool: &Pool) -> Result<PoolStats, ReserveError> {
        self.ensure_deployed(pool).await?;

        let contract = IHubPool::new(pool.address, self.provider.clone());
        let stats = self
            .bounded(pool.address, contract.getDEXStats().call())
            .await?;

        debug!(
            "getDEXStats {}: hub={}, token={}, trades={}",
            pool.label(),
            stats._tTrustReserve,
            stats._tokenReserve,
            stats._totalTrades
        );

        Ok(PoolStats {
            reserves: PoolReserves {
                hub: stats._tTrustReserve,
                other: stats._tokenReserve,
                read_at: Utc::now(),
            },
            total_volume: stats._totalVolume,
            total_trades: stats._totalTrades,
            total_liquidity: stats._totalLiquidity,
        })
    }
}

#[async_trait::async_trait]
impl AmountOutSource for RpcPoolReader {
    async fn amount_out(
        &self,
        pool: &Pool,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256, ReserveError> {
        let contract = IHubPool::new(pool.address, self.provider.clone());
        self.bounded(pool.address, contract.getAmountOut(token_in, amount_in).call())
            .await
    }
}

#[async_trait::async_trait]
impl BalanceSource for RpcPoolReader {
    async fn balance_of(&self, token: &Token, account: Address) -> SwapResult<U256> {
        let read = async {
            if token.is_native() {
                Ok(self.provider.get_balance(account).await?)
            } else {
                let erc20 = IERC20::new(token.address, self.provider.clone());
                Ok::<U256, SwapError>(erc20.balanceOf(account).call().await?)
            }
        };

        match tokio::time::timeout(self.timeout, read).await {
            Ok(result) => result,
            Err(_) => Err(SwapError::Timeout(self.timeout.as_secs())),
        }
    }
}
