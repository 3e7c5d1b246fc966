use crate::core::{Pool, PoolStats, ReserveError, Token, TokenRegistry, TokenSymbol};
use crate::discovery::{read_all_balances, read_all_stats, BalanceSource, ReserveReader};
use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Account whose balances are refreshed along with the pools
#[derive(Clone)]
pub struct BalanceWatch {
    pub source: Arc<dyn BalanceSource>,
    pub account: Address,
}

/// Pool stats and balances as of one refresh
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub pools: Vec<(Pool, Result<PoolStats, ReserveError>)>,
    pub balances: Vec<(Token, Result<U256, String>)>,
    pub refreshed_at: DateTime<Utc>,
    pub sequence: u64,
}

impl MarketSnapshot {
    pub fn stats_for(&self, symbol: TokenSymbol) -> Option<&PoolStats> {
        self.pools
            .iter()
            .find(|(pool, _)| pool.token.symbol == symbol)
            .and_then(|(_, result)| result.as_ref().ok())
    }

    pub fn balance_of(&self, symbol: TokenSymbol) -> Option<U256> {
        self.balances
            .iter()
            .find(|(token, _)| token.symbol == symbol)
            .and_then(|(_, result)| result.as_ref().ok().copied())
    }

    pub fn failed_pools(&self) -> usize {
        self.pools.iter().filter(|(_, result)| result.is_err()).count()
    }
}

/// Reads every pool and, if requested, every balance once
pub async fn refresh_once(
    registry: &TokenRegistry,
    reader: &dyn ReserveReader,
    balances: Option<&BalanceWatch>,
    sequence: u64,
) -> MarketSnapshot {
    let pools = read_all_stats(reader, registry).await;
    let balances = match balances {
        Some(target) => read_all_balances(target.source.as_ref(), registry, target.account)
            .await
            .into_iter()
            .map(|(token, result)| (token, result.map_err(|e| e.to_string())))
            .collect(),
        None => Vec::new(),
    };

    MarketSnapshot {
        pools,
        balances,
        refreshed_at: Utc::now(),
        sequence,
    }
}

/// Background task re-reading market data on a fixed interval.
///
/// Publishes into its own channel and never touches pending quote requests.
pub struct MarketRefresher {
    snapshots: watch::Receiver<Option<MarketSnapshot>>,
    task: JoinHandle<()>,
}

impl MarketRefresher {
    /// The first refresh runs immediately
    pub fn spawn(
        registry: Arc<TokenRegistry>,
        reader: Arc<dyn ReserveReader>,
        balances: Option<BalanceWatch>,
        every: Duration,
    ) -> Self {
        let (tx, snapshots) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence = 0u64;

            loop {
                ticker.tick().await;
                sequence += 1;

                let snapshot =
                    refresh_once(&registry, reader.as_ref(), balances.as_ref(), sequence).await;
                debug!(
                    "Market refresh #{}: {} pools, {} failed",
                    sequence,
                    snapshot.pools.len(),
                    snapshot.failed_pools()
                );

                if tx.send(Some(snapshot)).is_err() {
                    info!("Market refresher has no subscribers, stopping");
                    break;
                }
            }
        });

        Self { snapshots, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<MarketSnapshot>> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Option<MarketSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for MarketRefresher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
