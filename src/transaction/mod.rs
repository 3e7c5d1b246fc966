pub mod executor;
pub mod monitor;
pub mod planner;
pub mod wallet;

pub use executor::{SwapExecutor, SwapReceipt, TransactionSender, TxReceipt, TxRequest};
pub use monitor::{classify_failure, retry_with_backoff, ExecutionFault, RetryConfig};
pub use planner::{ExecutionPlan, ExecutionPlanner, ExecutionStep};
pub use wallet::WalletClient;
