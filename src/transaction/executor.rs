use crate::analytics::{SwapEvent, SwapReporter};
use crate::core::SwapFailed;
use crate::transaction::monitor::{classify_failure, ExecutionFault};
use crate::transaction::planner::{ExecutionPlan, ExecutionStep};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

/// A transaction ready for signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Signs, submits and confirms transactions for one account.
///
/// Nonce management and ordering are the implementation's concern.
#[async_trait::async_trait]
pub trait TransactionSender: Send + Sync {
    fn account(&self) -> Address;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ExecutionFault>;

    /// Submits `tx` and waits for its receipt
    async fn send_and_confirm(&self, tx: TxRequest) -> Result<TxReceipt, ExecutionFault>;
}

/// Outcome of a successfully executed plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `None` when no approval was needed or the allowance already sufficed
    pub approval_tx: Option<TxHash>,
    pub executed_at: DateTime<Utc>,
}

/// Runs an execution plan one confirmed step at a time
pub struct SwapExecutor {
    sender: Arc<dyn TransactionSender>,
    gas_limit: u64,
    reporter: Option<Arc<dyn SwapReporter>>,
}

impl SwapExecutor {
    pub fn new(sender: Arc<dyn TransactionSender>, gas_limit: u64) -> Self {
        Self {
            sender,
            gas_limit,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn SwapReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub async fn execute(&self, plan: &ExecutionPlan) -> Result<SwapReceipt, SwapFailed> {
        let mut approval_tx = None;

        for step in &plan.steps {
            debug!("Executing step: {}", step.describe());

            match step {
                ExecutionStep::Approve {
                    token,
                    token_address,
                    spender,
                    amount,
                } => {
                    let current = self
                        .sender
                        .allowance(*token_address, plan.account, *spender)
                        .await
                        .map_err(|fault| approval_failure(&fault))?;

                    if current >= *amount {
                        info!("Existing {} allowance {} covers {}, skipping approval", token, current, amount);
                        continue;
                    }

                    let receipt = self
                        .sender
                        .send_and_confirm(self.request_for(step)?)
                        .await
                        .map_err(|fault| approval_failure(&fault))?;
                    if !receipt.success {
                        return Err(SwapFailed::NetworkError(format!(
                            "approval transaction {} reverted",
                            receipt.tx_hash
                        )));
                    }

                    info!("Approved {} for {}: {}", token, spender, receipt.tx_hash);
                    approval_tx = Some(receipt.tx_hash);
                }
                ExecutionStep::PoolSwap { .. } | ExecutionStep::RouterSwap { .. } => {
                    let receipt = self
                        .sender
                        .send_and_confirm(self.request_for(step)?)
                        .await
                        .map_err(|fault| classify_failure(&fault, plan.minimum_received))?;

                    if !receipt.success {
                        let fault = ExecutionFault::reverted(format!(
                            "swap transaction {} reverted",
                            receipt.tx_hash
                        ));
                        return Err(classify_failure(&fault, plan.minimum_received));
                    }

                    info!(
                        "Swap {}→{} confirmed in block {:?}: {}",
                        plan.from, plan.to, receipt.block_number, receipt.tx_hash
                    );

                    let swap_receipt = SwapReceipt {
                        tx_hash: receipt.tx_hash,
                        block_number: receipt.block_number,
                        approval_tx,
                        executed_at: Utc::now(),
                    };
                    self.report(plan, &swap_receipt);
                    return Ok(swap_receipt);
                }
            }
        }

        warn!("Execution plan for {}→{} has no swap step", plan.from, plan.to);
        Err(SwapFailed::NetworkError(
            "execution plan contains no swap step".to_string(),
        ))
    }

    fn request_for(&self, step: &ExecutionStep) -> Result<TxRequest, SwapFailed> {
        let data = step
            .calldata()
            .ok_or_else(|| SwapFailed::InvalidStep(step.describe()))?;
        Ok(TxRequest {
            to: step.to(),
            data,
            value: step.value(),
            gas_limit: self.gas_limit,
        })
    }

    fn report(&self, plan: &ExecutionPlan, receipt: &SwapReceipt) {
        if let Some(reporter) = &self.reporter {
            reporter.report_swap(&SwapEvent::from_execution(plan, receipt));
        }
    }
}

/// Approvals can only be declined or fail; they never carry slippage
fn approval_failure(fault: &ExecutionFault) -> SwapFailed {
    match classify_failure(fault, U256::ZERO) {
        SwapFailed::UserRejected => SwapFailed::UserRejected,
        _ => SwapFailed::NetworkError(format!("approval failed: {}", fault)),
    }
}
