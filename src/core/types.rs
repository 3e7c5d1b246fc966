use crate::core::constants::*;
use crate::core::registry::TokenSymbol;
use alloy::primitives::{Address, U256};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: TokenSymbol,
    /// Zero address for the native hub asset
    pub address: Address,
    pub decimals: u8,
}

impl Token {
    pub fn new(symbol: TokenSymbol, address: Address) -> Self {
        Self {
            symbol,
            address,
            decimals: TOKEN_DECIMALS,
        }
    }

    pub fn hub() -> Self {
        Self::new(TokenSymbol::HUB, Address::ZERO)
    }

    pub fn is_native(&self) -> bool {
        self.symbol.is_hub()
    }
}

/// A constant-product pool pairing the hub asset with one other token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub address: Address,
    pub hub: Token,
    pub token: Token,
}

impl Pool {
    pub fn new(address: Address, hub: Token, token: Token) -> Self {
        Self {
            address,
            hub,
            token,
        }
    }

    pub fn contains(&self, symbol: TokenSymbol) -> bool {
        self.hub.symbol == symbol || self.token.symbol == symbol
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.hub.symbol, self.token.symbol)
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.address)
    }
}

/// Reserve balances read from a pool, in 18-decimal base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub hub: U256,
    pub other: U256,
    pub read_at: DateTime<Utc>,
}

impl PoolReserves {
    pub fn new(hub: U256, other: U256) -> Self {
        Self {
            hub,
            other,
            read_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hub.is_zero() || self.other.is_zero()
    }
}

/// Full `getDEXStats` tuple for a pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStats {
    pub reserves: PoolReserves,
    pub total_volume: U256,
    pub total_trades: U256,
    pub total_liquidity: U256,
}

/// One leg of a swap through a single pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub pool: Pool,
    pub token_in: TokenSymbol,
    pub token_out: TokenSymbol,
}

impl Hop {
    pub fn is_hub_in(&self) -> bool {
        self.token_in.is_hub()
    }

    /// Orders a reserve snapshot as (reserve_in, reserve_out) for this hop's direction
    pub fn orient(&self, reserves: &PoolReserves) -> (U256, U256) {
        if self.is_hub_in() {
            (reserves.hub, reserves.other)
        } else {
            (reserves.other, reserves.hub)
        }
    }

    pub fn token_in_address(&self) -> Address {
        if self.is_hub_in() {
            self.pool.hub.address
        } else {
            self.pool.token.address
        }
    }
}

/// Route from one token to another. Two-hop paths always pass through the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapPath {
    Direct(Hop),
    ViaHub(Hop, Hop),
}

impl SwapPath {
    pub fn hops(&self) -> Vec<&Hop> {
        match self {
            SwapPath::Direct(hop) => vec![hop],
            SwapPath::ViaHub(first, second) => vec![first, second],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SwapPath::Direct(_) => 1,
            SwapPath::ViaHub(_, _) => 2,
        }
    }

    pub fn is_multi_hop(&self) -> bool {
        matches!(self, SwapPath::ViaHub(_, _))
    }

    pub fn from_token(&self) -> TokenSymbol {
        match self {
            SwapPath::Direct(hop) | SwapPath::ViaHub(hop, _) => hop.token_in,
        }
    }

    pub fn to_token(&self) -> TokenSymbol {
        match self {
            SwapPath::Direct(hop) | SwapPath::ViaHub(_, hop) => hop.token_out,
        }
    }

    pub fn first(&self) -> &Hop {
        match self {
            SwapPath::Direct(hop) | SwapPath::ViaHub(hop, _) => hop,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SwapPath::Direct(hop) => format!("{} → {}", hop.token_in, hop.token_out),
            SwapPath::ViaHub(first, second) => format!(
                "{} → {} → {}",
                first.token_in, first.token_out, second.token_out
            ),
        }
    }
}

/// Swap fee as an exact fraction of the input amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl FeeRate {
    pub const PROTOCOL: FeeRate = FeeRate {
        numerator: FEE_NUMERATOR,
        denominator: FEE_DENOMINATOR,
    };

    pub fn as_percent(&self) -> Decimal {
        Decimal::from(self.numerator) * Decimal::ONE_HUNDRED / Decimal::from(self.denominator)
    }
}

/// User slippage tolerance in percent, always inside [0.1, 10].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlippageTolerance(Decimal);

impl SlippageTolerance {
    /// Out-of-range values are clamped to the nearest bound.
    pub fn new(percent: Decimal) -> Self {
        Self(percent.clamp(MIN_SLIPPAGE_PCT, MAX_SLIPPAGE_PCT))
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// Share of the quoted output that must be received, in parts per million
    pub fn keep_ppm(&self) -> u64 {
        let keep = (Decimal::ONE_HUNDRED - self.0) * Decimal::from(10_000u64);
        // 0.1% <= slippage <= 10% keeps this within [900_000, 999_000]
        keep.round().try_into().unwrap_or(0)
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self(DEFAULT_SLIPPAGE_PCT)
    }
}

impl fmt::Display for SlippageTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    pub amount_in: U256,
    pub slippage: SlippageTolerance,
}

/// Whether a failed reserve read may be retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMode {
    /// Driven by user input; a failed read fails the quote immediately
    Interactive,
    /// Re-check right before submission; reads retry with backoff
    Preflight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    LocalAmm,
    OnchainAmountOut,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::LocalAmm => write!(f, "local-amm"),
            StrategyKind::OnchainAmountOut => write!(f, "onchain-getAmountOut"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// The strategy ran but priced the hop at zero
    NoLiquidity,
    Overflow,
    /// The strategy's data source could not be reached
    Unavailable,
}

/// Why a quoting strategy could not price a hop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub hop: usize,
    pub strategy: StrategyKind,
    pub reason: String,
    pub cause: FailureCause,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopQuote {
    pub pool: Address,
    pub token_in: TokenSymbol,
    pub token_out: TokenSymbol,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee: U256,
    pub price_impact: Decimal,
    pub strategy: StrategyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactSeverity {
    Low,
    Medium,
    High,
}

impl ImpactSeverity {
    pub fn of(impact_pct: Decimal) -> Self {
        if impact_pct < LOW_IMPACT_PCT {
            ImpactSeverity::Low
        } else if impact_pct < MEDIUM_IMPACT_PCT {
            ImpactSeverity::Medium
        } else {
            ImpactSeverity::High
        }
    }
}

/// A priced swap. Never updated in place; any input change produces a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    pub amount_in: U256,
    pub amount_out: U256,
    pub minimum_received: U256,
    pub hops: Vec<HopQuote>,
    /// Aggregate impact in percent, capped for display
    pub price_impact: Decimal,
    /// Output per unit of input
    pub exchange_rate: Decimal,
    pub slippage: SlippageTolerance,
    pub quoted_at: DateTime<Utc>,
    pub reserve_epoch: u64,
    pub diagnostics: Vec<StrategyFailure>,
}

impl Quote {
    pub fn is_multi_hop(&self) -> bool {
        self.hops.len() > 1
    }

    /// Amount of the hub asset moved by this trade, used for volume reporting
    pub fn hub_volume(&self) -> U256 {
        if self.from.is_hub() {
            self.amount_in
        } else if self.to.is_hub() {
            self.amount_out
        } else {
            self.hops.first().map(|hop| hop.amount_out).unwrap_or_default()
        }
    }

    /// A TTL too large for a chrono duration never expires
    pub fn is_expired(&self, ttl_secs: u64, now: DateTime<Utc>) -> bool {
        match i64::try_from(ttl_secs).ok().and_then(Duration::try_seconds) {
            Some(ttl) => now.signed_duration_since(self.quoted_at) >= ttl,
            None => false,
        }
    }

    pub fn impact_severity(&self) -> ImpactSeverity {
        ImpactSeverity::of(self.price_impact)
    }

    pub fn pair_label(&self) -> String {
        format!("{}→{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_slippage_is_clamped() {
        assert_eq!(SlippageTolerance::new(dec!(0.01)).percent(), dec!(0.1));
        assert_eq!(SlippageTolerance::new(dec!(25)).percent(), dec!(10));
        assert_eq!(SlippageTolerance::new(dec!(-3)).percent(), dec!(0.1));
        assert_eq!(SlippageTolerance::new(dec!(2.5)).percent(), dec!(2.5));
        assert_eq!(SlippageTolerance::default().percent(), dec!(0.5));
    }

    #[test]
    fn test_keep_ppm() {
        assert_eq!(SlippageTolerance::new(dec!(0.5)).keep_ppm(), 995_000);
        assert_eq!(SlippageTolerance::new(dec!(0.1)).keep_ppm(), 999_000);
        assert_eq!(SlippageTolerance::new(dec!(10)).keep_ppm(), 900_000);
        assert_eq!(SlippageTolerance::new(dec!(0.125)).keep_ppm(), 998_750);
    }

    #[test]
    fn test_fee_rate_percent() {
        assert_eq!(FeeRate::PROTOCOL.as_percent(), dec!(0.3));
    }

    #[test]
    fn test_impact_severity_bands() {
        assert_eq!(ImpactSeverity::of(dec!(0.5)), ImpactSeverity::Low);
        assert_eq!(ImpactSeverity::of(dec!(1)), ImpactSeverity::Medium);
        assert_eq!(ImpactSeverity::of(dec!(2.99)), ImpactSeverity::Medium);
        assert_eq!(ImpactSeverity::of(dec!(3)), ImpactSeverity::High);
    }

    #[test]
    fn test_hop_orientation() {
        let pool = Pool::new(
            Address::repeat_byte(1),
            Token::hub(),
            Token::new(TokenSymbol::Oracle, Address::repeat_byte(2)),
        );
        let reserves = PoolReserves::new(U256::from(10u64), U256::from(5_000u64));

        let buy = Hop {
            pool: pool.clone(),
            token_in: TokenSymbol::Trust,
            token_out: TokenSymbol::Oracle,
        };
        assert_eq!(buy.orient(&reserves), (U256::from(10u64), U256::from(5_000u64)));
        assert_eq!(buy.token_in_address(), Address::ZERO);

        let sell = Hop {
            pool,
            token_in: TokenSymbol::Oracle,
            token_out: TokenSymbol::Trust,
        };
        assert_eq!(sell.orient(&reserves), (U256::from(5_000u64), U256::from(10u64)));
        assert_eq!(sell.token_in_address(), Address::repeat_byte(2));
    }

    #[test]
    fn test_quote_expiry_with_extreme_ttls() {
        use crate::core::registry::TokenRegistry;
        use crate::discovery::resolve_path;
        use crate::test_support::{ether, quote_for};

        let registry = TokenRegistry::for_network(crate::core::Network::IntuitionTestnet);
        let path = resolve_path(&registry, TokenSymbol::Trust, TokenSymbol::Oracle).unwrap();
        let quote = quote_for(&path, ether(1), ether(2), SlippageTolerance::default());
        let now = quote.quoted_at;

        assert!(!quote.is_expired(15, now));
        assert!(quote.is_expired(15, now + Duration::seconds(15)));
        assert!(!quote.is_expired(u64::MAX, now));
        assert!(!quote.is_expired(i64::MAX as u64, now + Duration::days(365)));
        assert!(!quote.is_expired(10_000_000_000_000_000, now));
    }
}
