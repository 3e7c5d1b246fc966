pub mod abi;
pub mod config;
pub mod constants;
pub mod error;
pub mod registry;
pub mod types;

pub use config::Config;
pub use constants::*;
pub use error::{PlanError, QuoteError, ReserveError, RouteError, SwapError, SwapFailed, SwapResult};
pub use registry::{Network, TokenRegistry, TokenSymbol};
pub use types::*;
