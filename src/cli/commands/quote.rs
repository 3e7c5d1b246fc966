use crate::cli::commands::{print_json, Context};
use crate::cli::{display::PoolDisplay, QuoteArgs};
use crate::core::{Config, QuoteMode, QuoteRequest, SwapResult};
use crate::utils::parse_amount;
use colored::*;
use console::style;
use log::info;
use serde_json::json;

pub async fn execute(args: QuoteArgs, config: Config, as_json: bool) -> SwapResult<()> {
    if !as_json {
        println!("{}", "🚀 HubSwap Quote".bold().cyan());
    }

    let amount_in = parse_amount(&args.amount)?;

    let pb = PoolDisplay::create_progress_bar("Connecting...");
    let context = match Context::connect(config).await {
        Ok(context) => context,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    let orchestrator = context.orchestrator(args.onchain_fallback);
    let request = QuoteRequest {
        from: args.from,
        to: args.to,
        amount_in,
        slippage: context.slippage(args.slippage),
    };

    info!(
        "Quoting {} {} -> {} (slippage {})",
        args.amount, request.from, request.to, request.slippage
    );

    pb.set_message("Reading pool reserves...");
    let result = orchestrator.quote_with_path(&request, QuoteMode::Interactive).await;
    pb.finish_and_clear();

    let (quote, path) = match result {
        Ok(found) => found,
        Err(e) => {
            if !as_json {
                println!("{} {}", "❌ No quote:".red().bold(), e);
            }
            return Err(e.into());
        }
    };

    if as_json {
        return print_json(&json!({ "quote": quote, "path": path }));
    }

    println!("\n{}", "📈 Quote".bold().green());
    PoolDisplay::display_quote(&quote, &path);
    println!(
        "{}",
        style(format!(
            "💡 Quotes are valid for {}s; run `swap` to execute",
            orchestrator.quote_ttl_secs()
        ))
        .dim()
    );

    Ok(())
}
