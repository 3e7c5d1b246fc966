use crate::core::TokenSymbol;
use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

pub mod commands;
pub mod display;

#[derive(Parser)]
#[command(name = "hubswap")]
#[command(about = "Quote and swap through hub-and-spoke AMM pools", long_about = None)]
pub struct Cli {
    /// Print JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Quote a swap from live pool reserves
    Quote(QuoteArgs),

    /// Re-quote, confirm and execute a swap
    Swap(SwapArgs),

    /// Show reserves and statistics of every pool
    Pools(PoolsArgs),

    /// List supported tokens on the configured network
    Tokens,

    /// Show native and token balances of an account
    Balances(BalancesArgs),
}

#[derive(Parser)]
pub struct QuoteArgs {
    /// Token to sell (e.g. tTRUST, ORACLE)
    #[arg(value_parser = parse_symbol)]
    pub from: TokenSymbol,

    /// Token to buy
    #[arg(value_parser = parse_symbol)]
    pub to: TokenSymbol,

    /// Amount to sell, in whole tokens (e.g. 1.5)
    pub amount: String,

    /// Slippage tolerance in percent, clamped to 0.1..10
    #[arg(short, long, value_parser = parse_percent)]
    pub slippage: Option<Decimal>,

    /// Ask the pool contract when local math cannot price a hop
    #[arg(long)]
    pub onchain_fallback: bool,
}

#[derive(Parser)]
pub struct SwapArgs {
    /// Token to sell
    #[arg(value_parser = parse_symbol)]
    pub from: TokenSymbol,

    /// Token to buy
    #[arg(value_parser = parse_symbol)]
    pub to: TokenSymbol,

    /// Amount to sell, in whole tokens
    pub amount: String,

    /// Slippage tolerance in percent, clamped to 0.1..10
    #[arg(short, long, value_parser = parse_percent)]
    pub slippage: Option<Decimal>,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser)]
pub struct PoolsArgs {
    /// Keep refreshing until interrupted
    #[arg(short, long)]
    pub follow: bool,
}

#[derive(Parser)]
pub struct BalancesArgs {
    /// Account to inspect; defaults to the PRIVATE_KEY account
    #[arg(value_parser = parse_address)]
    pub account: Option<Address>,
}

fn parse_symbol(s: &str) -> Result<TokenSymbol, String> {
    s.parse::<TokenSymbol>().map_err(|e| e.to_string())
}

fn parse_percent(s: &str) -> Result<Decimal, String> {
    s.trim()
        .trim_end_matches('%')
        .parse::<Decimal>()
        .map_err(|e| format!("Invalid percentage {}: {}", s, e))
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.parse::<Address>()
        .map_err(|e| format!("Invalid address: {}", e))
}
