use crate::cli::commands::{print_json, Context};
use crate::cli::{display::PoolDisplay, BalancesArgs};
use crate::core::{Config, SwapResult};
use crate::discovery::read_all_balances;
use crate::transaction::{TransactionSender, WalletClient};
use colored::*;
use serde_json::json;

pub async fn execute(args: BalancesArgs, config: Config, as_json: bool) -> SwapResult<()> {
    let account = match args.account {
        Some(account) => account,
        None => WalletClient::from_env(&config.rpc_url, config.timeout_secs)?.account(),
    };

    if !as_json {
        println!("{} {}", "🚀 HubSwap Balances for".bold().cyan(), account);
    }

    let pb = PoolDisplay::create_progress_bar("Reading balances...");
    let context = match Context::connect(config).await {
        Ok(context) => context,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    let balances: Vec<_> = read_all_balances(context.reader.as_ref(), &context.registry, account)
        .await
        .into_iter()
        .map(|(token, result)| (token, result.map_err(|e| e.to_string())))
        .collect();
    pb.finish_and_clear();

    if as_json {
        let entries: Vec<_> = balances
            .iter()
            .map(|(token, result)| match result {
                Ok(amount) => json!({ "symbol": token.symbol.as_str(), "balance": amount }),
                Err(e) => json!({ "symbol": token.symbol.as_str(), "error": e }),
            })
            .collect();
        return print_json(&json!({ "account": account, "balances": entries }));
    }

    PoolDisplay::display_balances(&balances);
    Ok(())
}
