pub mod balances;
pub mod pools;
pub mod quote;
pub mod swap;
pub mod tokens;

use crate::core::{Config, SlippageTolerance, SwapError, SwapResult, TokenRegistry};
use crate::discovery::RpcPoolReader;
use crate::orchestrator::QuoteOrchestrator;
use crate::quotes::StrategyChain;
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Connection and registry shared by every command
pub struct Context {
    pub config: Config,
    pub registry: Arc<TokenRegistry>,
    pub reader: Arc<RpcPoolReader>,
}

impl Context {
    /// Connects to the configured RPC and checks it serves the configured network
    pub async fn connect(config: Config) -> SwapResult<Self> {
        let reader = RpcPoolReader::connect(&config.rpc_url, config.timeout_secs)?;

        let chain_id = reader.chain_id().await?;
        if chain_id != config.network.chain_id() {
            return Err(SwapError::WrongNetwork {
                expected: config.network.chain_id(),
                actual: chain_id,
            });
        }
        info!("Connected to {} via {}", config.network, config.rpc_url);

        Ok(Self {
            registry: Arc::new(TokenRegistry::for_network(config.network)),
            reader: Arc::new(reader),
            config,
        })
    }

    pub fn orchestrator(&self, onchain_fallback: bool) -> QuoteOrchestrator {
        let strategies = if onchain_fallback {
            StrategyChain::with_onchain_fallback(self.reader.clone())
        } else {
            StrategyChain::local()
        };
        QuoteOrchestrator::from_config(
            self.registry.clone(),
            self.reader.clone(),
            strategies,
            &self.config,
        )
    }

    /// The flag value if given, otherwise the configured default
    pub fn slippage(&self, requested: Option<Decimal>) -> SlippageTolerance {
        requested.map_or_else(|| self.config.default_slippage(), SlippageTolerance::new)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> SwapResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
