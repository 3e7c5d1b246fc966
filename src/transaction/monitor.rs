use crate::core::{constants::*, Config, SwapFailed};
use alloy::primitives::U256;
use log::{info, warn};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Read retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries (milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (milliseconds)
    pub max_delay_ms: u64,
    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: MAX_RPC_RETRIES,
            base_delay_ms: RETRY_BASE_DELAY_MS,
            max_delay_ms: RETRY_MAX_DELAY_MS,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
            ..Self::default()
        }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let delay = (self.base_delay_ms as f64 * self.backoff_multiplier.powi(exponent)) as u64;
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// retry budget is spent. Returns the last error.
pub async fn retry_with_backoff<T, E, F, Fut>(
    retry: &RetryConfig,
    label: &str,
    is_retryable: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 0 {
                    info!("{} succeeded on retry attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < retry.max_retries && is_retryable(&e) => {
                attempt += 1;
                let delay = retry.delay_for(attempt);
                warn!(
                    "{} failed: {}. Retrying in {}ms (attempt {}/{})",
                    label,
                    e,
                    delay.as_millis(),
                    attempt,
                    retry.max_retries
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Raw failure reported by a wallet or node while executing a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFault {
    /// JSON-RPC / EIP-1193 error code when the provider returned one
    pub code: Option<i64>,
    pub message: String,
    /// The transaction was mined (or simulated) and reverted
    pub reverted: bool,
}

impl ExecutionFault {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            reverted: false,
        }
    }

    pub fn reverted(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            reverted: true,
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            reverted: false,
        }
    }
}

impl fmt::Display for ExecutionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Maps a fault on a swap step to the caller-facing failure kind
pub fn classify_failure(fault: &ExecutionFault, minimum_received: U256) -> SwapFailed {
    let message = fault.message.to_lowercase();

    if fault.code == Some(USER_REJECTED_CODE)
        || message.contains("user rejected")
        || message.contains("user denied")
        || message.contains("rejected by user")
    {
        return SwapFailed::UserRejected;
    }

    if fault.reverted
        || message.contains("execution reverted")
        || message.contains("slippage")
        || message.contains("insufficient output")
    {
        return SwapFailed::SlippageExceeded {
            minimum_received,
            reason: fault.message.clone(),
        };
    }

    SwapFailed::NetworkError(fault.to_string())
}
