use crate::core::TokenSymbol;
use crate::transaction::{ExecutionPlan, SwapReceipt};
use crate::utils::format_amount;
use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

/// Recorded once per confirmed swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapEvent {
    pub tx_hash: TxHash,
    pub kind: &'static str,
    pub account: Address,
    /// "ORACLE→tTRUST"
    pub pair: String,
    /// "1.5 ORACLE"
    pub amount: String,
    /// Volume in hub units, decimal string
    pub hub_volume: String,
    pub timestamp: DateTime<Utc>,
}

impl SwapEvent {
    pub fn from_execution(plan: &ExecutionPlan, receipt: &SwapReceipt) -> Self {
        Self {
            tx_hash: receipt.tx_hash,
            kind: "swap",
            account: plan.account,
            pair: pair_label(plan.from, plan.to),
            amount: format!("{} {}", format_amount(plan.amount_in, 6), plan.from),
            hub_volume: format_amount(plan.hub_volume, 18).replace(',', ""),
            timestamp: receipt.executed_at,
        }
    }
}

fn pair_label(from: TokenSymbol, to: TokenSymbol) -> String {
    format!("{}→{}", from, to)
}

/// Receives swap events. Reporting is fire-and-forget; a reporter must not
/// fail the swap it reports on.
pub trait SwapReporter: Send + Sync {
    fn report_swap(&self, event: &SwapEvent);
}

/// Writes events to the log under the `analytics` target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl SwapReporter for LogReporter {
    fn report_swap(&self, event: &SwapEvent) {
        match serde_json::to_string(event) {
            Ok(json) => info!(target: "analytics", "{}", json),
            Err(e) => info!(
                target: "analytics",
                "swap {} {} ({}): {}",
                event.tx_hash, event.pair, event.amount, e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ether;
    use alloy::primitives::{B256, U256};

    #[test]
    fn test_event_from_execution() {
        let plan = ExecutionPlan {
            account: Address::repeat_byte(3),
            from: TokenSymbol::Oracle,
            to: TokenSymbol::Trust,
            amount_in: ether(3) / U256::from(2u64),
            minimum_received: U256::from(1u64),
            hub_volume: ether(2),
            steps: Vec::new(),
        };
        let receipt = SwapReceipt {
            tx_hash: B256::repeat_byte(1),
            block_number: Some(10),
            approval_tx: None,
            executed_at: Utc::now(),
        };

        let event = SwapEvent::from_execution(&plan, &receipt);

        assert_eq!(event.kind, "swap");
        assert_eq!(event.pair, "ORACLE→tTRUST");
        assert_eq!(event.amount, "1.5 ORACLE");
        assert_eq!(event.hub_volume, "2");
        assert_eq!(event.account, plan.account);
        assert_eq!(event.tx_hash, receipt.tx_hash);
    }
}
