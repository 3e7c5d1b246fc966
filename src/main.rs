use clap::Parser;
use hubswap::cli::{commands, Cli, Commands};
use hubswap::core::{Config, SwapError};

#[tokio::main]
async fn main() -> Result<(), SwapError> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Quote(args) => commands::quote::execute(args, config, json).await?,
        Commands::Swap(args) => commands::swap::execute(args, config, json).await?,
        Commands::Pools(args) => commands::pools::execute(args, config, json).await?,
        Commands::Tokens => commands::tokens::execute(&config, json)?,
        Commands::Balances(args) => commands::balances::execute(args, config, json).await?,
    }

    Ok(())
}
