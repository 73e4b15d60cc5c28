//! CLI definitions for the `parley` binary.
//!
//! Uses clap derive macros. Running `parley` with no subcommand starts a
//! chat; `parley config` prints the effective configuration.

pub mod chat;
pub mod config;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use parley_infra::config::{load_chat_config, read_chat_config};
use parley_infra::paths::resolve_data_dir;
use parley_types::config::ChatConfig;

/// Chat with an LLM from the terminal.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors and the conversation itself.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "PARLEY_OTEL")]
    pub otel: bool,

    /// Read configuration from this file instead of the data directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print replies as plain text instead of rendered markdown.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Start an interactive conversation (the default).
    Chat,

    /// Show the effective configuration.
    Config {
        /// Print JSON instead of TOML.
        #[arg(long)]
        json: bool,
    },
}

/// Command-line values that take precedence over `config.toml`.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Model identifier to request.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// System prompt sent with every request.
    #[arg(long, global = true, value_name = "PROMPT")]
    pub system: Option<String>,

    /// Word that ends the session. Repeat to set several; replaces the configured set.
    #[arg(long = "exit-keyword", global = true, value_name = "WORD")]
    pub exit_keywords: Vec<String>,

    /// Seconds to wait for each reply before giving up.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra attempts per turn after a failed reply.
    #[arg(long, global = true, value_name = "N")]
    pub retries: Option<u32>,

    /// Upper bound on tokens per reply.
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ChatConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(system) = &self.system {
            config.system_prompt = Some(system.clone());
        }
        if !self.exit_keywords.is_empty() {
            config.exit_keywords = self.exit_keywords.clone();
        }
        if let Some(secs) = self.timeout {
            config.responder_timeout_secs = Some(secs);
        }
        if let Some(retries) = self.retries {
            config.retry.max_attempts = retries.saturating_add(1);
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
    }
}

impl Cli {
    /// Default tracing filter for the chosen verbosity. `RUST_LOG` wins over this.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Resolve the effective configuration: file, then command-line overrides.
pub async fn load_config(cli: &Cli) -> anyhow::Result<ChatConfig> {
    let mut config = match &cli.config {
        Some(path) => read_chat_config(path).await?,
        None => load_chat_config(&resolve_data_dir()).await,
    };

    cli.overrides.apply(&mut config);
    config.validate()?;

    tracing::debug!(model = %config.model, "configuration resolved");
    Ok(config)
}
