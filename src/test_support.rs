use crate::analytics::{SwapEvent, SwapReporter};
use crate::core::{
    FeeRate, HopQuote, Pool, PoolReserves, PoolStats, Quote, QuoteRequest, ReserveError,
    SlippageTolerance, StrategyKind, SwapPath, SwapResult, Token,
};
use crate::discovery::{AmountOutSource, BalanceSource, ReserveReader};
use crate::quotes::amm_calculator;
use crate::transaction::{ExecutionFault, TransactionSender, TxReceipt, TxRequest};
use alloy::primitives::{Address, B256, U256};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

/// What the next submitted transaction does
#[derive(Debug, Clone)]
pub enum SendScript {
    Confirm,
    Revert,
    Fault(ExecutionFault),
}

/// In-memory chain: pools, balances, allowances and a transaction log
pub struct MockChain {
    account: Address,
    reserves: Mutex<HashMap<Address, PoolReserves>>,
    failing_reads: Mutex<HashMap<Address, usize>>,
    amount_out: Mutex<HashMap<Address, Result<U256, ReserveError>>>,
    balances: Mutex<HashMap<(Address, Address), U256>>,
    allowances: Mutex<HashMap<(Address, Address), U256>>,
    scripts: Mutex<VecDeque<SendScript>>,
    sent: Mutex<Vec<TxRequest>>,
    reads: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            account: Address::repeat_byte(0xaa),
            reserves: Mutex::new(HashMap::new()),
            failing_reads: Mutex::new(HashMap::new()),
            amount_out: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
            allowances: Mutex::new(HashMap::new()),
            scripts: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn set_reserves(&self, pool: Address, hub: U256, other: U256) {
        self.reserves
            .lock()
            .unwrap()
            .insert(pool, PoolReserves::new(hub, other));
    }

    /// The next `count` reads of `pool` fail; `usize::MAX` fails forever
    pub fn fail_reads(&self, pool: Address, count: usize) {
        self.failing_reads.lock().unwrap().insert(pool, count);
    }

    pub fn set_amount_out(&self, pool: Address, result: Result<U256, ReserveError>) {
        self.amount_out.lock().unwrap().insert(pool, result);
    }

    pub fn set_balance(&self, token: Address, account: Address, amount: U256) {
        self.balances.lock().unwrap().insert((token, account), amount);
    }

    pub fn set_allowance(&self, token: Address, spender: Address, amount: U256) {
        self.allowances.lock().unwrap().insert((token, spender), amount);
    }

    pub fn script_send(&self, script: SendScript) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<TxRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Hash assigned to the `index`-th transaction that reached the chain
    pub fn hash_of(&self, index: usize) -> B256 {
        B256::with_last_byte((index + 1) as u8)
    }

    fn take_failure(&self, pool: Address) -> bool {
        let mut failing = self.failing_reads.lock().unwrap();
        match failing.get_mut(&pool) {
            Some(remaining) if *remaining > 0 => {
                if *remaining != usize::MAX {
                    *remaining -= 1;
                }
                true
            }
            _ => false,
        }
    }

    fn snapshot(&self, pool: Address) -> Option<PoolReserves> {
        self.reserves.lock().unwrap().get(&pool).copied()
    }
}

#[async_trait::async_trait]
impl ReserveReader for MockChain {
    async fn read_stats(&self, pool: &Pool) -> Result<PoolStats, ReserveError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.take_failure(pool.address) {
            return Err(ReserveError::ReserveUnavailable {
                pool: pool.address,
                reason: "connection reset by peer".to_string(),
            });
        }

        let reserves = self
            .snapshot(pool.address)
            .ok_or(ReserveError::PoolNotFound(pool.address))?;
        Ok(PoolStats {
            reserves,
            total_volume: U256::ZERO,
            total_trades: U256::from(1u64),
            total_liquidity: reserves.hub.saturating_add(reserves.other),
        })
    }
}

#[async_trait::async_trait]
impl AmountOutSource for MockChain {
    async fn amount_out(
        &self,
        pool: &Pool,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256, ReserveError> {
        if let Some(result) = self.amount_out.lock().unwrap().get(&pool.address) {
            return result.clone();
        }

        let reserves = self
            .snapshot(pool.address)
            .ok_or(ReserveError::PoolNotFound(pool.address))?;
        let (reserve_in, reserve_out) = if token_in == pool.hub.address {
            (reserves.hub, reserves.other)
        } else {
            (reserves.other, reserves.hub)
        };
        amm_calculator::quote_output(amount_in, reserve_in, reserve_out, FeeRate::PROTOCOL).map_err(
            |e| ReserveError::ReserveUnavailable {
                pool: pool.address,
                reason: e.to_string(),
            },
        )
    }
}

#[async_trait::async_trait]
impl BalanceSource for MockChain {
    async fn balance_of(&self, token: &Token, account: Address) -> SwapResult<U256> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&(token.address, account))
            .copied()
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl TransactionSender for MockChain {
    fn account(&self) -> Address {
        self.account
    }

    async fn allowance(
        &self,
        token: Address,
        _owner: Address,
        spender: Address,
    ) -> Result<U256, ExecutionFault> {
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(token, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn send_and_confirm(&self, tx: TxRequest) -> Result<TxReceipt, ExecutionFault> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SendScript::Confirm);

        let success = match script {
            SendScript::Fault(fault) => return Err(fault),
            SendScript::Confirm => true,
            SendScript::Revert => false,
        };

        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(TxReceipt {
            tx_hash: self.hash_of(sent.len() - 1),
            block_number: Some(100 + sent.len() as u64),
            success,
        })
    }
}

/// Keeps every reported event
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<SwapEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<SwapEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SwapReporter for RecordingReporter {
    fn report_swap(&self, event: &SwapEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// A quote over `path` with the given totals, as if just produced
pub fn quote_for(
    path: &SwapPath,
    amount_in: U256,
    amount_out: U256,
    slippage: SlippageTolerance,
) -> Quote {
    let hops = path
        .hops()
        .into_iter()
        .map(|hop| HopQuote {
            pool: hop.pool.address,
            token_in: hop.token_in,
            token_out: hop.token_out,
            amount_in,
            amount_out,
            fee: U256::ZERO,
            price_impact: Decimal::ONE,
            strategy: StrategyKind::LocalAmm,
        })
        .collect();

    Quote {
        from: path.from_token(),
        to: path.to_token(),
        amount_in,
        amount_out,
        minimum_received: amm_calculator::minimum_received(amount_out, slippage),
        hops,
        price_impact: Decimal::ONE,
        exchange_rate: amm_calculator::exchange_rate(amount_in, amount_out),
        slippage,
        quoted_at: Utc::now(),
        reserve_epoch: 0,
        diagnostics: Vec::new(),
    }
}

/// A quote for `request` that returns the input unchanged
pub fn echo_quote(request: &QuoteRequest) -> Quote {
    Quote {
        from: request.from,
        to: request.to,
        amount_in: request.amount_in,
        amount_out: request.amount_in,
        minimum_received: amm_calculator::minimum_received(request.amount_in, request.slippage),
        hops: Vec::new(),
        price_impact: Decimal::ZERO,
        exchange_rate: Decimal::ONE,
        slippage: request.slippage,
        quoted_at: Utc::now(),
        reserve_epoch: 0,
        diagnostics: Vec::new(),
    }
}
