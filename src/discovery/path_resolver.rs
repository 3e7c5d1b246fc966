use crate::core::{Hop, RouteError, SwapPath, TokenRegistry, TokenSymbol};
use log::debug;
use std::sync::Arc;

/// Resolves which pools a swap between two tokens must go through.
///
/// Every pool pairs with the hub, so a route is either the single pool of the
/// non-hub side, or the two pools `from/hub` and `hub/to`. No I/O.
#[derive(Debug, Clone)]
pub struct PathResolver {
    registry: Arc<TokenRegistry>,
}

impl PathResolver {
    pub fn new(registry: Arc<TokenRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn resolve_path(&self, from: TokenSymbol, to: TokenSymbol) -> Result<SwapPath, RouteError> {
        resolve_path(&self.registry, from, to)
    }
}

pub fn resolve_path(
    registry: &TokenRegistry,
    from: TokenSymbol,
    to: TokenSymbol,
) -> Result<SwapPath, RouteError> {
    if from == to {
        return Err(RouteError::IdenticalTokens(from));
    }

    let hub = registry.hub();
    let path = if from == hub || to == hub {
        SwapPath::Direct(direct_hop(registry, from, to)?)
    } else {
        SwapPath::ViaHub(
            direct_hop(registry, from, hub)?,
            direct_hop(registry, hub, to)?,
        )
    };

    debug!("Resolved {}→{} as {}", from, to, path.describe());
    Ok(path)
}

fn direct_hop(
    registry: &TokenRegistry,
    token_in: TokenSymbol,
    token_out: TokenSymbol,
) -> Result<Hop, RouteError> {
    let other = if token_in == registry.hub() { token_out } else { token_in };
    let pool = registry
        .pool_for(other)
        .ok_or(RouteError::UnsupportedToken(other))?;

    Ok(Hop {
        pool: pool.clone(),
        token_in,
        token_out,
    })
}
