use crate::core::{
    ImpactSeverity, Pool, PoolStats, Quote, ReserveError, SwapPath, Token, TokenRegistry,
};
use crate::quotes::amm_calculator::exchange_rate;
use crate::transaction::{ExecutionPlan, ExecutionStep, SwapReceipt};
use crate::utils::{format_amount, format_percent, short_address};
use alloy::primitives::U256;
use colored::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;

/// Display helper for quotes, pools and swap results
pub struct PoolDisplay;

impl PoolDisplay {
    pub fn display_quote(quote: &Quote, path: &SwapPath) {
        println!(
            "{} {} {} → {} {}",
            style("►").cyan(),
            format_amount(quote.amount_in, 6),
            quote.from.as_str().bold(),
            format_amount(quote.amount_out, 6),
            quote.to.as_str().bold()
        );
        println!("  Route: {}", path.describe());
        println!(
            "  Rate: 1 {} = {} {}",
            quote.from,
            quote.exchange_rate.round_dp(6).normalize(),
            quote.to
        );
        println!("  Price Impact: {}", format_impact(quote.price_impact));
        println!(
            "  Minimum Received: {} {} ({} slippage)",
            format_amount(quote.minimum_received, 6),
            quote.to,
            quote.slippage
        );

        for (index, hop) in quote.hops.iter().enumerate() {
            println!(
                "  Hop {}: {} {} → {} {} | fee {} {} | {} | {}",
                index + 1,
                format_amount(hop.amount_in, 6),
                hop.token_in,
                format_amount(hop.amount_out, 6),
                hop.token_out,
                format_amount(hop.fee, 6),
                hop.token_in,
                hop.strategy,
                style(short_address(&hop.pool)).dim()
            );
        }

        for failure in &quote.diagnostics {
            println!(
                "  {} hop {} {}: {}",
                style("note").dim(),
                failure.hop + 1,
                failure.strategy,
                style(&failure.reason).dim()
            );
        }
        println!();
    }

    pub fn display_pool_list(pools: &[(Pool, Result<PoolStats, ReserveError>)]) {
        println!("\n{}", style("🏊 Pools").bold().underlined());

        for (i, (pool, result)) in pools.iter().enumerate() {
            println!(
                "{}. {} {}",
                i + 1,
                pool.label().bold(),
                style(short_address(&pool.address)).dim()
            );

            match result {
                Ok(stats) => {
                    let reserves = &stats.reserves;
                    println!(
                        "   Reserves: {} {} | {} {}",
                        format_amount(reserves.hub, 4),
                        pool.hub.symbol,
                        format_amount(reserves.other, 4),
                        pool.token.symbol
                    );
                    println!(
                        "   Price: 1 {} = {} {}",
                        pool.hub.symbol,
                        exchange_rate(reserves.hub, reserves.other).round_dp(6).normalize(),
                        pool.token.symbol
                    );
                    println!(
                        "   Volume: {} {} | Trades: {} | Liquidity: {}",
                        format_amount(stats.total_volume, 4),
                        pool.hub.symbol,
                        stats.total_trades,
                        format_amount(stats.total_liquidity, 4)
                    );
                }
                Err(e) => println!("   {} {}", "unavailable:".red(), e),
            }
        }
        println!();
    }

    pub fn display_token_list(registry: &TokenRegistry) {
        println!(
            "\n{} {}",
            style("🪙 Tokens on").bold().underlined(),
            registry.network().to_string().bold()
        );

        for token in registry.tokens() {
            let address = if token.is_native() {
                "native".to_string()
            } else {
                token.address.to_checksum(None)
            };
            println!(
                "{} {:<7} {:<30} {}",
                token.symbol.icon(),
                token.symbol.as_str().bold(),
                token.symbol.name(),
                style(address).dim()
            );
        }
        println!();
    }

    pub fn display_balances(balances: &[(Token, Result<U256, String>)]) {
        println!("\n{}", style("💰 Balances").bold().underlined());
        for (token, result) in balances {
            match result {
                Ok(amount) => println!(
                    "{} {:<7} {}",
                    token.symbol.icon(),
                    token.symbol.as_str().bold(),
                    format_amount(*amount, 6)
                ),
                Err(e) => println!(
                    "{} {:<7} {} {}",
                    token.symbol.icon(),
                    token.symbol.as_str().bold(),
                    "unavailable:".red(),
                    e
                ),
            }
        }
        println!();
    }

    /// Create a progress bar for operations
    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(spinner.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }

    pub fn display_swap_confirmation(quote: &Quote, plan: &ExecutionPlan) {
        println!("\n{}", style("💱 Swap Confirmation").bold().underlined());
        println!(
            "Swap: {} {} → {} {}",
            format_amount(quote.amount_in, 6),
            quote.from.as_str().bold(),
            format_amount(quote.amount_out, 6),
            quote.to.as_str().bold()
        );
        println!("Price Impact: {}", format_impact(quote.price_impact));
        println!(
            "Min Output: {} {} (with {} slippage)",
            format_amount(plan.minimum_received, 6),
            quote.to,
            quote.slippage
        );

        println!("Steps:");
        for (i, step) in plan.steps.iter().enumerate() {
            let marker = match step {
                ExecutionStep::Approve { .. } => "approve".yellow(),
                _ => "swap".green(),
            };
            println!("  {}. [{}] {}", i + 1, marker, step.describe());
        }
    }

    pub fn display_transaction_result(receipt: &SwapReceipt, explorer_url: Option<&str>) {
        println!("\n{}", style("✅ Swap Confirmed!").bold().green());
        if let Some(approval) = receipt.approval_tx {
            println!("Approval: {}", style(approval).dim());
        }
        println!("Transaction: {}", style(receipt.tx_hash).dim());
        if let Some(block) = receipt.block_number {
            println!("Block: {}", block);
        }
        if let Some(explorer) = explorer_url {
            println!(
                "{}",
                style(format!("View on explorer: {}/tx/{}", explorer, receipt.tx_hash)).dim()
            );
        }
    }
}

/// Price impact coloured by severity band
pub fn format_impact(impact: Decimal) -> ColoredString {
    let text = format_percent(impact);
    match ImpactSeverity::of(impact) {
        ImpactSeverity::Low => text.green(),
        ImpactSeverity::Medium => text.yellow(),
        ImpactSeverity::High => text.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_impact_text() {
        colored::control::set_override(false);
        assert_eq!(format_impact(dec!(0.254)).to_string(), "0.25%");
        assert_eq!(format_impact(dec!(15)).to_string(), "15.00%");
    }
}
