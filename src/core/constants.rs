use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Chain IDs
pub const INTUITION_TESTNET_CHAIN_ID: u64 = 13579;
pub const LOCAL_HARDHAT_CHAIN_ID: u64 = 31337;

// Default RPC endpoints
pub const INTUITION_TESTNET_RPC_URL: &str = "https://testnet.rpc.intuition.systems";
pub const LOCAL_HARDHAT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const INTUITION_EXPLORER_URL: &str = "https://testnet.explorer.intuition.systems";

// All tokens use 18 decimals on this protocol
pub const TOKEN_DECIMALS: u8 = 18;

// Protocol swap fee: 0.3%
pub const FEE_NUMERATOR: u64 = 3;
pub const FEE_DENOMINATOR: u64 = 1000;

// Slippage tolerance bounds, in percent
pub const MIN_SLIPPAGE_PCT: Decimal = dec!(0.1);
pub const MAX_SLIPPAGE_PCT: Decimal = dec!(10);
pub const DEFAULT_SLIPPAGE_PCT: Decimal = dec!(0.5);

// Displayed aggregate price impact never exceeds this, in percent
pub const MAX_DISPLAYED_IMPACT_PCT: Decimal = dec!(15);

// Price impact severity bands, in percent
pub const LOW_IMPACT_PCT: Decimal = dec!(1);
pub const MEDIUM_IMPACT_PCT: Decimal = dec!(3);

// Quote lifecycle
pub const QUOTE_TTL_SECS: u64 = 15;
pub const MAX_QUOTE_TTL_SECS: u64 = 3_600;
pub const DEBOUNCE_MS: u64 = 500;
pub const REFRESH_INTERVAL_SECS: u64 = 30;

// RPC Configuration
pub const DEFAULT_RPC_TIMEOUT: u64 = 30;
pub const MAX_RPC_RETRIES: u32 = 3;
pub const RETRY_BASE_DELAY_MS: u64 = 500;
pub const RETRY_MAX_DELAY_MS: u64 = 8_000;

// Transaction Configuration
pub const SWAP_GAS_LIMIT: u64 = 300_000;

// JSON-RPC error code wallets return when the user declines a request
pub const USER_REJECTED_CODE: i64 = 4001;
