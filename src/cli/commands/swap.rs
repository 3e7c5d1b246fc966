use crate::analytics::LogReporter;
use crate::cli::commands::{print_json, Context};
use crate::cli::{display::PoolDisplay, SwapArgs};
use crate::core::{Config, Quote, QuoteMode, QuoteRequest, SwapResult};
use crate::orchestrator::QuoteOrchestrator;
use crate::transaction::{
    ExecutionPlan, ExecutionPlanner, SwapExecutor, TransactionSender, WalletClient,
};
use crate::utils::parse_amount;
use alloy::primitives::Address;
use colored::*;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use log::{info, warn};
use std::sync::Arc;

pub async fn execute(args: SwapArgs, config: Config, as_json: bool) -> SwapResult<()> {
    if !as_json {
        println!("{}", "🚀 HubSwap Swap".bold().cyan());
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

    let wallet = WalletClient::from_env(&context.config.rpc_url, context.config.timeout_secs)?;
    wallet.ensure_network(context.config.network).await?;
    let account = wallet.account();
    info!("Using wallet: {}", account);

    let orchestrator = context.orchestrator(false);
    let planner = ExecutionPlanner::new(context.registry.clone(), orchestrator.quote_ttl_secs());
    let request = QuoteRequest {
        from: args.from,
        to: args.to,
        amount_in,
        slippage: context.slippage(args.slippage),
    };

    pb.set_message("Quoting against fresh reserves...");
    let prepared = prepare(&orchestrator, &planner, &request, account).await;
    pb.finish_and_clear();
    let (mut quote, mut plan) = prepared?;

    if !as_json {
        PoolDisplay::display_swap_confirmation(&quote, &plan);
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Execute this swap?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Swap cancelled".yellow());
            return Ok(());
        }
    }

    if !orchestrator.is_current(&quote) {
        warn!("Quote went stale while waiting for confirmation, re-quoting");
        let previous_minimum = plan.minimum_received;
        (quote, plan) = prepare(&orchestrator, &planner, &request, account).await?;

        if plan.minimum_received < previous_minimum && !args.yes {
            PoolDisplay::display_swap_confirmation(&quote, &plan);
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("The price moved against you. Execute anyway?")
                .default(false)
                .interact()?;
            if !confirmed {
                println!("{}", "Swap cancelled".yellow());
                return Ok(());
            }
        }
    }

    let executor = SwapExecutor::new(Arc::new(wallet), context.config.gas_limit)
        .with_reporter(Arc::new(LogReporter));

    let pb = PoolDisplay::create_progress_bar(if plan.needs_approval() {
        "Approving and swapping..."
    } else {
        "Swapping..."
    });
    let result = executor.execute(&plan).await;
    pb.finish_and_clear();
    orchestrator.invalidate();

    match result {
        Ok(receipt) => {
            if as_json {
                print_json(&receipt)?;
            } else {
                PoolDisplay::display_transaction_result(
                    &receipt,
                    context.config.network.explorer_url(),
                );
            }
            Ok(())
        }
        Err(failure) if failure.is_silent() => {
            info!("Swap {} declined in wallet", quote.pair_label());
            Ok(())
        }
        Err(failure) => {
            if !as_json {
                println!("{} {}", "❌ Swap failed:".red().bold(), failure);
                if failure.is_retryable() {
                    println!("{}", style("💡 Network errors are safe to retry").dim());
                }
            }
            Err(failure.into())
        }
    }
}

/// Preflight quote plus plan; reserve reads retry with backoff
async fn prepare(
    orchestrator: &QuoteOrchestrator,
    planner: &ExecutionPlanner,
    request: &QuoteRequest,
    account: Address,
) -> SwapResult<(Quote, ExecutionPlan)> {
    let (quote, path) = orchestrator
        .quote_with_path(request, QuoteMode::Preflight)
        .await?;
    let plan = planner.plan_swap(&quote, &path, account)?;
    Ok((quote, plan))
}
