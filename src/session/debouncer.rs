use crate::core::{Config, Quote, QuoteError, QuoteMode, QuoteRequest};
use crate::orchestrator::QuoteOrchestrator;
use log::debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Latest state of the debounced quote
#[derive(Debug, Clone)]
pub enum QuoteUpdate {
    /// No amount entered
    Idle,
    /// Waiting out the debounce window or computing
    Pending,
    Ready(Quote),
    Failed(QuoteError),
}

impl QuoteUpdate {
    pub fn is_settled(&self) -> bool {
        !matches!(self, QuoteUpdate::Pending)
    }
}

/// Re-quotes on input changes after a quiet period.
///
/// Only the newest request is ever computed. A request that arrives while an
/// older one is still computing drops the older computation, so its result is
/// never published.
pub struct QuoteDebouncer {
    input: watch::Sender<Option<QuoteRequest>>,
    output: watch::Receiver<QuoteUpdate>,
    task: JoinHandle<()>,
}

impl QuoteDebouncer {
    pub fn spawn<F, Fut>(delay: Duration, quote_fn: F) -> Self
    where
        F: Fn(QuoteRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Quote, QuoteError>> + Send + 'static,
    {
        let (input, requests) = watch::channel(None);
        let (updates, output) = watch::channel(QuoteUpdate::Idle);
        let task = tokio::spawn(run(delay, requests, updates, quote_fn));

        Self {
            input,
            output,
            task,
        }
    }

    /// Interactive quoting through `orchestrator` with the configured delay
    pub fn for_orchestrator(orchestrator: Arc<QuoteOrchestrator>, config: &Config) -> Self {
        Self::spawn(Duration::from_millis(config.debounce_ms), move |request| {
            let orchestrator = orchestrator.clone();
            async move { orchestrator.get_quote(&request, QuoteMode::Interactive).await }
        })
    }

    /// Replaces whatever request is pending
    pub fn submit(&self, request: QuoteRequest) {
        self.input.send_replace(Some(request));
    }

    /// Cancels pending and in-flight work, e.g. when the amount is cleared
    pub fn clear(&self) {
        self.input.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<QuoteUpdate> {
        self.output.clone()
    }

    pub fn latest(&self) -> QuoteUpdate {
        self.output.borrow().clone()
    }
}

impl Drop for QuoteDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<F, Fut>(
    delay: Duration,
    mut requests: watch::Receiver<Option<QuoteRequest>>,
    updates: watch::Sender<QuoteUpdate>,
    quote_fn: F,
) where
    F: Fn(QuoteRequest) -> Fut,
    Fut: Future<Output = Result<Quote, QuoteError>>,
{
    while requests.changed().await.is_ok() {
        'latest: loop {
            let Some(request) = requests.borrow_and_update().clone() else {
                updates.send_replace(QuoteUpdate::Idle);
                break 'latest;
            };
            updates.send_replace(QuoteUpdate::Pending);

            tokio::select! {
                changed = requests.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    debug!("Quote request superseded during debounce");
                    continue 'latest;
                }
                _ = sleep(delay) => {}
            }

            debug!(
                "Quoting {} {}→{}",
                request.amount_in, request.from, request.to
            );
            tokio::select! {
                changed = requests.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    debug!("Dropping in-flight quote for {}→{}", request.from, request.to);
                    continue 'latest;
                }
                result = quote_fn(request.clone()) => {
                    let update = match result {
                        Ok(quote) => QuoteUpdate::Ready(quote),
                        Err(e) => QuoteUpdate::Failed(e),
                    };
                    updates.send_replace(update);
                    break 'latest;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SlippageTolerance, TokenSymbol};
    use crate::test_support::{echo_quote, ether};
    use alloy::primitives::{Address, U256};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn request(amount: u64) -> QuoteRequest {
        QuoteRequest {
            from: TokenSymbol::Trust,
            to: TokenSymbol::Oracle,
            amount_in: ether(amount),
            slippage: SlippageTolerance::default(),
        }
    }

    async fn next_settled(updates: &mut watch::Receiver<QuoteUpdate>) -> QuoteUpdate {
        loop {
            updates.changed().await.unwrap();
            let update = updates.borrow_and_update().clone();
            if update.is_settled() {
                return update;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_quotes_once() {
        let calls = Arc::new(Mutex::new(Vec::<U256>::new()));
        let recorded = calls.clone();
        let debouncer = QuoteDebouncer::spawn(Duration::from_millis(500), move |request| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(request.amount_in);
                Ok::<_, QuoteError>(echo_quote(&request))
            }
        });
        let mut updates = debouncer.subscribe();

        for amount in [1, 10, 100] {
            debouncer.submit(request(amount));
            sleep(Duration::from_millis(100)).await;
        }

        match next_settled(&mut updates).await {
            QuoteUpdate::Ready(quote) => assert_eq!(quote.amount_in, ether(100)),
            other => panic!("unexpected update {:?}", other),
        }
        assert_eq!(*calls.lock().unwrap(), vec![ether(100)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_computation_is_never_published() {
        let completed = Arc::new(AtomicUsize::new(0));
        let finished = completed.clone();
        let debouncer = QuoteDebouncer::spawn(Duration::from_millis(500), move |request| {
            let finished = finished.clone();
            async move {
                if request.amount_in == ether(1) {
                    sleep(Duration::from_secs(2)).await;
                }
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<_, QuoteError>(echo_quote(&request))
            }
        });
        let mut updates = debouncer.subscribe();

        debouncer.submit(request(1));
        // past the debounce window, so the slow quote is in flight
        sleep(Duration::from_millis(700)).await;
        debouncer.submit(request(2));

        match next_settled(&mut updates).await {
            QuoteUpdate::Ready(quote) => assert_eq!(quote.amount_in, ether(2)),
            other => panic!("unexpected update {:?}", other),
        }

        sleep(Duration::from_secs(5)).await;
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        match debouncer.latest() {
            QuoteUpdate::Ready(quote) => assert_eq!(quote.amount_in, ether(2)),
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let debouncer = QuoteDebouncer::spawn(Duration::from_millis(500), move |request| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, QuoteError>(echo_quote(&request))
            }
        });

        debouncer.submit(request(5));
        sleep(Duration::from_millis(200)).await;
        debouncer.clear();
        sleep(Duration::from_secs(2)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(matches!(debouncer.latest(), QuoteUpdate::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_orchestrator_backed_debouncer() {
        use crate::core::{Network, TokenRegistry};
        use crate::discovery::PathResolver;
        use crate::quotes::StrategyChain;
        use crate::test_support::MockChain;
        use crate::transaction::RetryConfig;

        let registry = Arc::new(TokenRegistry::for_network(Network::IntuitionTestnet));
        let chain = Arc::new(MockChain::new());
        for pool in registry.pools() {
            chain.set_reserves(pool.address, ether(1_000), ether(500_000));
        }
        let orchestrator = Arc::new(QuoteOrchestrator::new(
            PathResolver::new(registry),
            chain.clone(),
            StrategyChain::local(),
            RetryConfig::none(),
            15,
        ));
        let debouncer = QuoteDebouncer::for_orchestrator(orchestrator, &Config::default());
        let mut updates = debouncer.subscribe();

        debouncer.submit(request(1));
        debouncer.submit(request(1));

        match next_settled(&mut updates).await {
            QuoteUpdate::Ready(quote) => {
                assert_eq!(quote.amount_out, U256::from(498_003_490_519_951_608_246u128))
            }
            other => panic!("unexpected update {:?}", other),
        }
        assert_eq!(chain.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_published() {
        let debouncer = QuoteDebouncer::spawn(Duration::from_millis(500), |_request| async {
            Err::<Quote, _>(QuoteError::InsufficientLiquidity {
                pool: Address::ZERO,
            })
        });
        let mut updates = debouncer.subscribe();

        debouncer.submit(request(3));

        match next_settled(&mut updates).await {
            QuoteUpdate::Failed(QuoteError::InsufficientLiquidity { pool }) => {
                assert_eq!(pool, Address::ZERO)
            }
            other => panic!("unexpected update {:?}", other),
        }
    }
}
