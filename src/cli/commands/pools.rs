use crate::cli::commands::{print_json, Context};
use crate::cli::{display::PoolDisplay, PoolsArgs};
use crate::core::{Config, SwapError, SwapResult};
use crate::session::{refresh_once, MarketRefresher, MarketSnapshot};
use colored::*;
use console::style;
use log::info;
use serde_json::json;
use std::time::Duration;

pub async fn execute(args: PoolsArgs, config: Config, as_json: bool) -> SwapResult<()> {
    if !as_json {
        println!("{}", "🚀 HubSwap Pools".bold().cyan());
    }

    let pb = PoolDisplay::create_progress_bar("Reading pool statistics...");
    let context = match Context::connect(config).await {
        Ok(context) => context,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    if !args.follow {
        let snapshot = refresh_once(&context.registry, context.reader.as_ref(), None, 1).await;
        pb.finish_and_clear();
        show(&snapshot, as_json)?;

        if !snapshot.pools.is_empty() && snapshot.failed_pools() == snapshot.pools.len() {
            return Err(SwapError::RpcError("no pool could be read".to_string()));
        }
        return Ok(());
    }
    pb.finish_and_clear();

    let every = Duration::from_secs(context.config.refresh_interval_secs);
    info!("Refreshing pools every {}s", every.as_secs());
    let refresher = MarketRefresher::spawn(
        context.registry.clone(),
        context.reader.clone(),
        None,
        every,
    );
    let mut snapshots = refresher.subscribe();

    loop {
        let changed = tokio::select! {
            changed = snapshots.changed() => changed,
            _ = tokio::signal::ctrl_c() => break,
        };
        if changed.is_err() {
            break;
        }

        let latest = snapshots.borrow_and_update().clone();
        if let Some(snapshot) = latest {
            show(&snapshot, as_json)?;
            if !as_json {
                println!(
                    "{}",
                    style(format!("Refreshing every {}s, Ctrl-C to stop", every.as_secs())).dim()
                );
            }
        }
    }

    refresher.stop();
    Ok(())
}

fn show(snapshot: &MarketSnapshot, as_json: bool) -> SwapResult<()> {
    if as_json {
        let pools: Vec<_> = snapshot
            .pools
            .iter()
            .map(|(pool, result)| match result {
                Ok(stats) => json!({ "pool": pool, "stats": stats }),
                Err(e) => json!({ "pool": pool, "error": e.to_string() }),
            })
            .collect();
        return print_json(&json!({
            "sequence": snapshot.sequence,
            "refreshed_at": snapshot.refreshed_at,
            "pools": pools,
        }));
    }

    PoolDisplay::display_pool_list(&snapshot.pools);
    Ok(())
}
