use crate::core::{constants::*, error::SwapResult, registry::Network, SlippageTolerance, SwapError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub timeout_secs: u64,
    pub default_slippage_pct: Decimal,
    pub quote_ttl_secs: u64,
    pub debounce_ms: u64,
    pub refresh_interval_secs: u64,
    pub gas_limit: u64,
}

impl Config {
    pub fn from_env() -> SwapResult<Self> {
        let network = match env::var("HUBSWAP_NETWORK") {
            Ok(value) => value.parse::<Network>().map_err(SwapError::ConfigError)?,
            Err(_) => Network::IntuitionTestnet,
        };

        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| network.default_rpc_url().to_string());

        Ok(Self {
            network,
            rpc_url,
            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_default()
                .parse()
                .unwrap_or(MAX_RPC_RETRIES),
            retry_base_delay_ms: env::var("RETRY_BASE_DELAY_MS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(RETRY_BASE_DELAY_MS),
            timeout_secs: env::var("TIMEOUT_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_RPC_TIMEOUT),
            default_slippage_pct: SlippageTolerance::new(
                env::var("DEFAULT_SLIPPAGE")
                    .unwrap_or_default()
                    .parse()
                    .unwrap_or(DEFAULT_SLIPPAGE_PCT),
            )
            .percent(),
            quote_ttl_secs: env::var("QUOTE_TTL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(QUOTE_TTL_SECS),
            debounce_ms: env::var("DEBOUNCE_MS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEBOUNCE_MS),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(REFRESH_INTERVAL_SECS),
            gas_limit: env::var("GAS_LIMIT")
                .unwrap_or_default()
                .parse()
                .unwrap_or(SWAP_GAS_LIMIT),
        })
    }

    /// Default tolerance, clamped like any other slippage input
    pub fn default_slippage(&self) -> SlippageTolerance {
        SlippageTolerance::new(self.default_slippage_pct)
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.timeout_secs == 0 {
            return Err(SwapError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.quote_ttl_secs == 0 || self.quote_ttl_secs > MAX_QUOTE_TTL_SECS {
            return Err(SwapError::ConfigError(format!(
                "Quote TTL must be between 1 and {} seconds",
                MAX_QUOTE_TTL_SECS
            )));
        }

        if self.refresh_interval_secs == 0 {
            return Err(SwapError::ConfigError(
                "Refresh interval must be greater than 0".to_string(),
            ));
        }

        if self.gas_limit < 21_000 {
            return Err(SwapError::ConfigError(
                "Gas limit is below the cost of a plain transfer".to_string(),
            ));
        }

        url_scheme_ok(&self.rpc_url)
    }
}

fn url_scheme_ok(url: &str) -> SwapResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(SwapError::ConfigError(format!(
            "RPC URL must be http(s): {}",
            url
        )))
    }
}

impl Default for Config {
    fn default() -> Self {
        let network = Network::IntuitionTestnet;
        Self {
            network,
            rpc_url: network.default_rpc_url().to_string(),
            max_retries: MAX_RPC_RETRIES,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
            timeout_secs: DEFAULT_RPC_TIMEOUT,
            default_slippage_pct: DEFAULT_SLIPPAGE_PCT,
            quote_ttl_secs: QUOTE_TTL_SECS,
            debounce_ms: DEBOUNCE_MS,
            refresh_interval_secs: REFRESH_INTERVAL_SECS,
            gas_limit: SWAP_GAS_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network, Network::IntuitionTestnet);
        assert_eq!(config.gas_limit, 300_000);
    }

    #[test]
    fn test_out_of_range_default_slippage_is_clamped() {
        let config = Config {
            default_slippage_pct: dec!(12),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.default_slippage().percent(), dec!(10));

        let config = Config {
            default_slippage_pct: dec!(0.01),
            ..Config::default()
        };
        assert_eq!(config.default_slippage().percent(), dec!(0.1));
    }

    #[test]
    fn test_quote_ttl_bounds() {
        for ttl in [0, MAX_QUOTE_TTL_SECS + 1, u64::MAX] {
            let config = Config {
                quote_ttl_secs: ttl,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "ttl {} accepted", ttl);
        }

        let config = Config {
            quote_ttl_secs: MAX_QUOTE_TTL_SECS,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            rpc_url: "ws://127.0.0.1:8545".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            gas_limit: 100,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
