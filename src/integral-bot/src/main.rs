//! Integral bot binary.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use integral_bot::{BotConfig, IntegralBot};

/// Integral bot
#[derive(Parser)]
#[command(name = "integral-bot")]
#[command(about = "Socionics integral type calculations as Discord slash commands")]
#[command(version)]
struct Args {
    /// Configuration file path (TOML). Defaults to the environment.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the command registration payload as JSON.
    Schema,

    /// Register all commands with Discord.
    Deploy,

    /// Dispatch an interaction payload and print the replies as JSON.
    Dispatch {
        /// Path to the interaction JSON, or `-` for stdin.
        #[arg(long)]
        payload: String,
    },
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

fn read_payload(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read payload from {}", source))
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => BotConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BotConfig::from_env().context("Failed to load config from environment")?,
    };

    let bot = IntegralBot::new(config).context("Failed to load commands")?;

    match args.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&bot.schemas())?);
        }
        Command::Deploy => {
            let count = bot.deploy().await?;
            match bot.config().guild_id.as_deref() {
                Some(guild) => info!("Registered {} commands in guild {}", count, guild),
                None => info!("Registered {} global commands", count),
            }
        }
        Command::Dispatch { payload } => {
            let json = read_payload(&payload)?;
            let (outcome, replies) = bot.handle_json(&json).await?;
            info!("Dispatch outcome: {:?}", outcome);
            println!("{}", serde_json::to_string_pretty(&replies)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
