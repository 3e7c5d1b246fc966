use crate::cli::commands::print_json;
use crate::cli::display::PoolDisplay;
use crate::core::{Config, SwapResult, TokenRegistry};
use serde_json::json;

/// Static listing; needs no RPC connection
pub fn execute(config: &Config, as_json: bool) -> SwapResult<()> {
    let registry = TokenRegistry::for_network(config.network);

    if as_json {
        let tokens: Vec<_> = registry
            .tokens()
            .map(|token| {
                json!({
                    "symbol": token.symbol.as_str(),
                    "name": token.symbol.name(),
                    "icon": token.symbol.icon(),
                    "address": token.address,
                    "native": token.is_native(),
                    "pool": registry.pool_for(token.symbol).map(|pool| pool.address),
                })
            })
            .collect();
        return print_json(&json!({
            "network": config.network.name(),
            "chain_id": config.network.chain_id(),
            "router": registry.router(),
            "tokens": tokens,
        }));
    }

    PoolDisplay::display_token_list(&registry);
    Ok(())
}
