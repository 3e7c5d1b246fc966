use crate::core::{
    Config, FailureCause, Hop, PoolReserves, Quote, QuoteError, QuoteMode, QuoteRequest,
    ReserveError, SwapPath, TokenRegistry, MAX_DISPLAYED_IMPACT_PCT,
};
use crate::discovery::{PathResolver, ReserveReader};
use crate::quotes::amm_calculator::{compound_impact, exchange_rate, minimum_received};
use crate::quotes::{HopOutcome, StrategyChain};
use crate::transaction::monitor::{retry_with_backoff, RetryConfig};
use chrono::Utc;
use futures::future::try_join_all;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Produces quotes from live reserves.
///
/// Every quote reads reserves fresh for each hop of its path. Each successful
/// read advances the reserve epoch, and a quote is only current while the
/// epoch it recorded is still the latest one and its TTL has not run out.
pub struct QuoteOrchestrator {
    resolver: PathResolver,
    reader: Arc<dyn ReserveReader>,
    strategies: StrategyChain,
    retry: RetryConfig,
    quote_ttl_secs: u64,
    epoch: AtomicU64,
}

impl QuoteOrchestrator {
    pub fn new(
        resolver: PathResolver,
        reader: Arc<dyn ReserveReader>,
        strategies: StrategyChain,
        retry: RetryConfig,
        quote_ttl_secs: u64,
    ) -> Self {
        Self {
            resolver,
            reader,
            strategies,
            retry,
            quote_ttl_secs,
            epoch: AtomicU64::new(0),
        }
    }

    pub fn from_config(
        registry: Arc<TokenRegistry>,
        reader: Arc<dyn ReserveReader>,
        strategies: StrategyChain,
        config: &Config,
    ) -> Self {
        Self::new(
            PathResolver::new(registry),
            reader,
            strategies,
            RetryConfig::from_config(config),
            config.quote_ttl_secs,
        )
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn quote_ttl_secs(&self) -> u64 {
        self.quote_ttl_secs
    }

    pub async fn get_quote(
        &self,
        request: &QuoteRequest,
        mode: QuoteMode,
    ) -> Result<Quote, QuoteError> {
        self.quote_with_path(request, mode).await.map(|(quote, _)| quote)
    }

    /// Same as [`get_quote`](Self::get_quote), also returning the resolved path
    pub async fn quote_with_path(
        &self,
        request: &QuoteRequest,
        mode: QuoteMode,
    ) -> Result<(Quote, SwapPath), QuoteError> {
        let path = self.resolver.resolve_path(request.from, request.to)?;
        let hops = path.hops();

        let snapshots = try_join_all(
            hops.iter()
                .enumerate()
                .map(|(index, hop)| self.read_hop_reserves(index, hop, mode)),
        )
        .await?;
        let reserve_epoch = self.epoch.load(Ordering::SeqCst);

        let mut amount = request.amount_in;
        let mut hop_quotes = Vec::with_capacity(hops.len());
        let mut diagnostics = Vec::new();

        for (index, (hop, reserves)) in hops.iter().zip(snapshots.iter()).enumerate() {
            let outcome = self.strategies.quote_hop(index, hop, reserves, amount).await;
            diagnostics.extend(outcome.failures.iter().cloned());

            match outcome.quote {
                Some(hop_quote) => {
                    amount = hop_quote.amount_out;
                    hop_quotes.push(hop_quote);
                }
                None => return Err(hop_failure(index, hop, &outcome)),
            }
        }

        let impacts: Vec<Decimal> = hop_quotes.iter().map(|h| h.price_impact).collect();
        let price_impact = compound_impact(&impacts, MAX_DISPLAYED_IMPACT_PCT);

        let quote = Quote {
            from: request.from,
            to: request.to,
            amount_in: request.amount_in,
            amount_out: amount,
            minimum_received: minimum_received(amount, request.slippage),
            hops: hop_quotes,
            price_impact,
            exchange_rate: exchange_rate(request.amount_in, amount),
            slippage: request.slippage,
            quoted_at: Utc::now(),
            reserve_epoch,
            diagnostics,
        };

        info!(
            "Quote {} via {}: {} -> {} (impact {:.4}%, min {})",
            quote.pair_label(),
            path.describe(),
            quote.amount_in,
            quote.amount_out,
            quote.price_impact,
            quote.minimum_received
        );

        Ok((quote, path))
    }

    /// Whether `quote` can still be acted on
    pub fn is_current(&self, quote: &Quote) -> bool {
        quote.reserve_epoch == self.epoch.load(Ordering::SeqCst)
            && !quote.is_expired(self.quote_ttl_secs, Utc::now())
    }

    /// Marks every outstanding quote stale, e.g. after a swap lands
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    async fn read_hop_reserves(
        &self,
        index: usize,
        hop: &Hop,
        mode: QuoteMode,
    ) -> Result<PoolReserves, QuoteError> {
        let retry = match mode {
            QuoteMode::Interactive => RetryConfig::none(),
            QuoteMode::Preflight => self.retry.clone(),
        };
        let label = format!("Reserve read for {}", hop.pool.label());
        let reader = &self.reader;
        let pool = &hop.pool;

        let reserves = retry_with_backoff(&retry, &label, QuoteError::is_retryable, move || async move {
            reader
                .read_reserves(pool)
                .await
                .map_err(|source| QuoteError::ReserveUnavailable { hop: index, source })
        })
        .await?;

        self.epoch.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Hop {} reserves for {}: hub={}, other={}",
            index,
            pool.label(),
            reserves.hub,
            reserves.other
        );
        Ok(reserves)
    }
}

fn hop_failure(index: usize, hop: &Hop, outcome: &HopOutcome) -> QuoteError {
    if outcome.saw_no_liquidity() {
        QuoteError::InsufficientLiquidity {
            pool: hop.pool.address,
        }
    } else if outcome.saw(FailureCause::Overflow) {
        QuoteError::MathOverflow
    } else {
        let reason = outcome
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.strategy, f.reason))
            .collect::<Vec<_>>()
            .join("; ");
        QuoteError::ReserveUnavailable {
            hop: index,
            source: ReserveError::ReserveUnavailable {
                pool: hop.pool.address,
                reason,
            },
        }
    }
}
