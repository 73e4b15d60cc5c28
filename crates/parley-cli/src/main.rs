//! parley entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, sets up tracing, resolves the effective
//! configuration, then runs the chat loop or prints the configuration.

mod cli;

use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    parley_observe::tracing_setup::init_tracing(cli.log_directive(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    parley_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli::load_config(&cli).await?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let options = cli::chat::loop_runner::ChatOptions {
                plain: cli.plain,
                quiet: cli.quiet,
            };
            cli::chat::loop_runner::run_chat(config, options).await?;
        }
        Commands::Config { json } => {
            cli::config::show_config(&config, json)?;
        }
    }

    Ok(())
}
