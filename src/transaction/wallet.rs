use crate::core::abi::IERC20;
use crate::core::{Network, SwapError, SwapResult};
use crate::transaction::executor::{TransactionSender, TxReceipt, TxRequest};
use crate::transaction::monitor::ExecutionFault;
use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use alloy::transports::TransportError;
use log::info;
use std::env;
use std::time::Duration;

/// Signs with a local private key and submits over JSON-RPC
pub struct WalletClient {
    provider: DynProvider,
    account: Address,
    confirm_timeout: Duration,
}

impl WalletClient {
    pub fn connect(rpc_url: &str, private_key: &str, timeout_secs: u64) -> SwapResult<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| SwapError::ConfigError(format!("Invalid private key: {}", e)))?;
        let account = signer.address();

        let url: Url = rpc_url
            .parse()
            .map_err(|e| SwapError::ConfigError(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            account,
            confirm_timeout: Duration::from_secs(timeout_secs.saturating_mul(4)),
        })
    }

    /// Reads the key from `PRIVATE_KEY`
    pub fn from_env(rpc_url: &str, timeout_secs: u64) -> SwapResult<Self> {
        let key = env::var("PRIVATE_KEY")
            .map_err(|_| SwapError::ConfigError("PRIVATE_KEY is not set".to_string()))?;
        Self::connect(rpc_url, &key, timeout_secs)
    }

    /// Fails with `WrongNetwork` unless the node serves `expected`
    pub async fn ensure_network(&self, expected: Network) -> SwapResult<()> {
        let actual = self.provider.get_chain_id().await?;
        if actual != expected.chain_id() {
            return Err(SwapError::WrongNetwork {
                expected: expected.chain_id(),
                actual,
            });
        }
        Ok(())
    }
}

fn fault_from_transport(err: TransportError) -> ExecutionFault {
    match err.as_error_resp() {
        Some(payload) => {
            let message = payload.message.to_string();
            ExecutionFault {
                code: Some(payload.code),
                reverted: message.to_lowercase().contains("revert"),
                message,
            }
        }
        None => ExecutionFault::network(err.to_string()),
    }
}

fn fault_from_contract(err: alloy::contract::Error) -> ExecutionFault {
    match err {
        alloy::contract::Error::TransportError(e) => fault_from_transport(e),
        other => ExecutionFault::network(other.to_string()),
    }
}

#[async_trait::async_trait]
impl TransactionSender for WalletClient {
    fn account(&self) -> Address {
        self.account
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ExecutionFault> {
        IERC20::new(token, self.provider.clone())
            .allowance(owner, spender)
            .call()
            .await
            .map_err(fault_from_contract)
    }

    async fn send_and_confirm(&self, tx: TxRequest) -> Result<TxReceipt, ExecutionFault> {
        let request = TransactionRequest::default()
            .with_from(self.account)
            .with_to(tx.to)
            .with_input(tx.data)
            .with_value(tx.value)
            .with_gas_limit(tx.gas_limit);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(fault_from_transport)?;
        let tx_hash = *pending.tx_hash();
        info!("Transaction sent: {}", tx_hash);

        let receipt = pending
            .with_timeout(Some(self.confirm_timeout))
            .get_receipt()
            .await
            .map_err(|e| ExecutionFault::network(e.to_string()))?;

        Ok(TxReceipt {
            tx_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
        })
    }
}
