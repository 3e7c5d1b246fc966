use crate::core::registry::{TokenSymbol, UnknownSymbol};
use alloy::primitives::{Address, U256};
use thiserror::Error;

pub type SwapResult<T> = Result<T, SwapError>;

/// Failures reading pool state. Never retried by the reader itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReserveError {
    #[error("Reserves unavailable for pool {pool}: {reason}")]
    ReserveUnavailable { pool: Address, reason: String },

    #[error("No contract deployed at pool address {0}")]
    PoolNotFound(Address),
}

/// Pair resolution failures. Pure input/configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Cannot swap {0} to itself")]
    IdenticalTokens(TokenSymbol),

    #[error("No pool registered for {0}")]
    UnsupportedToken(TokenSymbol),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Unroutable pair: {0}")]
    UnroutablePair(#[from] RouteError),

    #[error("Could not read reserves for hop {hop}: {source}")]
    ReserveUnavailable {
        hop: usize,
        #[source]
        source: ReserveError,
    },

    #[error("Insufficient liquidity in pool {pool}")]
    InsufficientLiquidity { pool: Address },

    #[error("Math overflow in quote calculation")]
    MathOverflow,
}

impl QuoteError {
    /// Transport failures can be retried; everything else is permanent for this input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QuoteError::ReserveUnavailable {
                source: ReserveError::ReserveUnavailable { .. },
                ..
            }
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Quote expired or reserves changed since it was produced")]
    QuoteExpired,

    #[error("No router deployed for multi-hop swap {0}→{1}")]
    RouterUnavailable(TokenSymbol, TokenSymbol),

    #[error("Quote is for {quote_from}→{quote_to} but path is {path_from}→{path_to}")]
    PathMismatch {
        quote_from: TokenSymbol,
        quote_to: TokenSymbol,
        path_from: TokenSymbol,
        path_to: TokenSymbol,
    },
}

/// Classified outcome of a swap that did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapFailed {
    #[error("Slippage exceeded: output fell below the minimum of {minimum_received} ({reason})")]
    SlippageExceeded {
        minimum_received: U256,
        reason: String,
    },

    #[error("Transaction was rejected by user")]
    UserRejected,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid execution step: {0}")]
    InvalidStep(String),
}

impl SwapFailed {
    /// User rejections are not shown as errors
    pub fn is_silent(&self) -> bool {
        matches!(self, SwapFailed::UserRejected)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SwapFailed::NetworkError(_))
    }
}

#[derive(Error, Debug)]
pub enum SwapError {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Swap(#[from] SwapFailed),

    #[error(transparent)]
    Reserve(#[from] ReserveError),

    #[error(transparent)]
    UnknownToken(#[from] UnknownSymbol),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wrong network: connected to chain {actual}, expected {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout: operation took longer than {0} seconds")]
    Timeout(u64),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for SwapError {
    fn from(err: anyhow::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}

impl From<alloy::transports::TransportError> for SwapError {
    fn from(err: alloy::transports::TransportError) -> Self {
        SwapError::RpcError(err.to_string())
    }
}

impl From<alloy::contract::Error> for SwapError {
    fn from(err: alloy::contract::Error) -> Self {
        SwapError::RpcError(err.to_string())
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_quote_errors() {
        let transient = QuoteError::ReserveUnavailable {
            hop: 0,
            source: ReserveError::ReserveUnavailable {
                pool: Address::ZERO,
                reason: "timeout".to_string(),
            },
        };
        assert!(transient.is_retryable());

        let missing = QuoteError::ReserveUnavailable {
            hop: 1,
            source: ReserveError::PoolNotFound(Address::ZERO),
        };
        assert!(!missing.is_retryable());

        let same = QuoteError::from(RouteError::IdenticalTokens(TokenSymbol::Oracle));
        assert!(!same.is_retryable());
        assert!(!QuoteError::InsufficientLiquidity { pool: Address::ZERO }.is_retryable());
    }

    #[test]
    fn test_swap_failure_policy() {
        assert!(SwapFailed::UserRejected.is_silent());
        assert!(!SwapFailed::NetworkError("x".to_string()).is_silent());
        assert!(SwapFailed::NetworkError("x".to_string()).is_retryable());

        let slippage = SwapFailed::SlippageExceeded {
            minimum_received: U256::from(1u64),
            reason: "reverted".to_string(),
        };
        assert!(!slippage.is_retryable());
        assert!(!slippage.is_silent());
    }
}
