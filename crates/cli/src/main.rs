//! verse: multilingual multi-scripture chat.
//!
//! `verse serve` runs the HTTP API, `verse ask` answers one message,
//! `verse corpora` reports what the corpus store loads.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, CorporaCommand, ServeCommand};
use std::path::PathBuf;
use verse_core::{config::AppConfig, logging};

/// Grounded answers from multiple scripture corpora, in the asker's language
#[derive(Parser, Debug)]
#[command(name = "verse")]
#[command(about = "Grounded answers from multiple scripture corpora", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "VERSE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: <workspace>/.verse/config.yaml)
    #[arg(short, long, global = true, env = "VERSE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace or EnvFilter directives)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generation provider (gemini, ollama)
    #[arg(short, long, global = true, env = "VERSE_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "VERSE_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeCommand),

    /// Answer one message and exit
    Ask(AskCommand),

    /// List configured corpora
    Corpora(CorporaCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let provider_only = cli.provider.is_some() && cli.model.is_none();
    let mut config = AppConfig::load_from(cli.workspace.clone(), cli.config.clone())
        .context("Failed to load configuration")?
        .with_overrides(
            cli.workspace,
            cli.config,
            cli.provider,
            cli.model,
            cli.log_level,
            cli.verbose,
            cli.no_color,
        );

    // Switching provider without a model picks that provider's configured model
    if provider_only {
        if let Some(provider_config) = config.get_provider_config(&config.provider) {
            config.model = provider_config.model().to_string();
        }
    }

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Corpora(_) => "corpora",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match &cli.command {
        Commands::Serve(cmd) => {
            config.validate()?;
            cmd.execute(&config).await
        }
        Commands::Ask(cmd) => {
            config.validate()?;
            cmd.execute(&config).await
        }
        Commands::Corpora(cmd) => cmd.execute(&config).await,
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }

    Ok(result?)
}
