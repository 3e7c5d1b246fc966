pub mod analytics;
pub mod cli;
pub mod core;
pub mod discovery;
pub mod orchestrator;
pub mod quotes;
pub mod session;
pub mod transaction;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use core::{Config, Quote, QuoteRequest, SwapError, SwapResult, TokenRegistry, TokenSymbol};
pub use discovery::{resolve_path, ReserveReader, RpcPoolReader};
pub use orchestrator::QuoteOrchestrator;
pub use quotes::{AmmQuoteCalculator, StrategyChain};
pub use session::{MarketRefresher, QuoteDebouncer};
pub use transaction::{ExecutionPlanner, SwapExecutor};
