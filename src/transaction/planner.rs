use crate::core::abi::{self, SwapEntry};
use crate::core::{Hop, PlanError, Quote, SwapPath, TokenRegistry, TokenSymbol};
use alloy::primitives::{Address, Bytes, U256};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

/// One on-chain action in a swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExecutionStep {
    /// Grant `spender` an ERC-20 allowance of exactly `amount`
    Approve {
        token: TokenSymbol,
        token_address: Address,
        spender: Address,
        amount: U256,
    },
    /// Call one of a pool's directional swap functions
    PoolSwap {
        pool: Address,
        token: TokenSymbol,
        entry: SwapEntry,
        amount_in: U256,
        min_amount_out: U256,
        value: U256,
    },
    /// Route both legs through the router in a single transaction
    RouterSwap {
        router: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        value: U256,
    },
}

impl ExecutionStep {
    pub fn to(&self) -> Address {
        match self {
            ExecutionStep::Approve { token_address, .. } => *token_address,
            ExecutionStep::PoolSwap { pool, .. } => *pool,
            ExecutionStep::RouterSwap { router, .. } => *router,
        }
    }

    pub fn value(&self) -> U256 {
        match self {
            ExecutionStep::Approve { .. } => U256::ZERO,
            ExecutionStep::PoolSwap { value, .. } | ExecutionStep::RouterSwap { value, .. } => *value,
        }
    }

    /// `None` when the step names a pool swap the pool does not expose
    pub fn calldata(&self) -> Option<Bytes> {
        match self {
            ExecutionStep::Approve { spender, amount, .. } => Some(abi::encode_approve(*spender, *amount)),
            ExecutionStep::PoolSwap {
                token,
                entry,
                amount_in,
                min_amount_out,
                ..
            } => abi::encode_pool_swap(*token, *entry, *amount_in, *min_amount_out),
            ExecutionStep::RouterSwap {
                token_in,
                token_out,
                amount_in,
                min_amount_out,
                ..
            } => Some(abi::encode_router_swap(*token_in, *token_out, *amount_in, *min_amount_out)),
        }
    }

    pub fn is_swap(&self) -> bool {
        !matches!(self, ExecutionStep::Approve { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            ExecutionStep::Approve { token, spender, .. } => {
                format!("Approve {} for {}", token, spender)
            }
            ExecutionStep::PoolSwap { token, entry, .. } => {
                let signature = abi::swap_signature(*token, *entry).unwrap_or("swap");
                format!("Pool swap {}", signature)
            }
            ExecutionStep::RouterSwap { .. } => "Router swap (2 hops)".to_string(),
        }
    }
}

/// Ordered steps for one swap. Steps run strictly in order; a later step
/// never starts before the previous one is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub account: Address,
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    pub amount_in: U256,
    pub minimum_received: U256,
    /// Hub asset moved by the trade, for volume reporting
    pub hub_volume: U256,
    pub steps: Vec<ExecutionStep>,
}

impl ExecutionPlan {
    pub fn swap_step(&self) -> Option<&ExecutionStep> {
        self.steps.iter().find(|step| step.is_swap())
    }

    pub fn needs_approval(&self) -> bool {
        self.steps.iter().any(|step| !step.is_swap())
    }
}

/// Turns a fresh quote into the transactions that realize it
#[derive(Debug, Clone)]
pub struct ExecutionPlanner {
    registry: Arc<TokenRegistry>,
    quote_ttl_secs: u64,
}

impl ExecutionPlanner {
    pub fn new(registry: Arc<TokenRegistry>, quote_ttl_secs: u64) -> Self {
        Self {
            registry,
            quote_ttl_secs,
        }
    }

    pub fn plan_swap(
        &self,
        quote: &Quote,
        path: &SwapPath,
        account: Address,
    ) -> Result<ExecutionPlan, PlanError> {
        self.plan_swap_at(quote, path, account, Utc::now())
    }

    pub fn plan_swap_at(
        &self,
        quote: &Quote,
        path: &SwapPath,
        account: Address,
        now: DateTime<Utc>,
    ) -> Result<ExecutionPlan, PlanError> {
        if quote.is_expired(self.quote_ttl_secs, now) {
            return Err(PlanError::QuoteExpired);
        }

        if quote.from != path.from_token() || quote.to != path.to_token() {
            return Err(PlanError::PathMismatch {
                quote_from: quote.from,
                quote_to: quote.to,
                path_from: path.from_token(),
                path_to: path.to_token(),
            });
        }

        let steps = match path {
            SwapPath::Direct(hop) => self.direct_steps(hop, quote),
            SwapPath::ViaHub(first, second) => self.router_steps(first, second, quote)?,
        };

        debug!(
            "Planned {} with {} step(s): {}",
            quote.pair_label(),
            steps.len(),
            steps.iter().map(|s| s.describe()).collect::<Vec<_>>().join(", ")
        );

        Ok(ExecutionPlan {
            account,
            from: quote.from,
            to: quote.to,
            amount_in: quote.amount_in,
            minimum_received: quote.minimum_received,
            hub_volume: quote.hub_volume(),
            steps,
        })
    }

    fn direct_steps(&self, hop: &Hop, quote: &Quote) -> Vec<ExecutionStep> {
        let pool = &hop.pool;

        if hop.is_hub_in() {
            // Native value carries the input; the amount argument is unused
            return vec![ExecutionStep::PoolSwap {
                pool: pool.address,
                token: pool.token.symbol,
                entry: SwapEntry::HubIn,
                amount_in: U256::ZERO,
                min_amount_out: quote.minimum_received,
                value: quote.amount_in,
            }];
        }

        vec![
            ExecutionStep::Approve {
                token: pool.token.symbol,
                token_address: pool.token.address,
                spender: pool.address,
                amount: quote.amount_in,
            },
            ExecutionStep::PoolSwap {
                pool: pool.address,
                token: pool.token.symbol,
                entry: SwapEntry::HubOut,
                amount_in: quote.amount_in,
                min_amount_out: quote.minimum_received,
                value: U256::ZERO,
            },
        ]
    }

    fn router_steps(
        &self,
        first: &Hop,
        second: &Hop,
        quote: &Quote,
    ) -> Result<Vec<ExecutionStep>, PlanError> {
        let router = self
            .registry
            .router()
            .ok_or(PlanError::RouterUnavailable(quote.from, quote.to))?;

        let token_in = first.token_in_address();
        let token_out = if second.token_out == second.pool.token.symbol {
            second.pool.token.address
        } else {
            second.pool.hub.address
        };

        let mut steps = Vec::with_capacity(2);
        let value = if first.is_hub_in() {
            quote.amount_in
        } else {
            steps.push(ExecutionStep::Approve {
                token: first.token_in,
                token_address: token_in,
                spender: router,
                amount: quote.amount_in,
            });
            U256::ZERO
        };

        steps.push(ExecutionStep::RouterSwap {
            router,
            token_in,
            token_out,
            amount_in: quote.amount_in,
            min_amount_out: quote.minimum_received,
            value,
        });

        Ok(steps)
    }
}
