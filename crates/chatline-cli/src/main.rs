//! chatline CLI: Replay chat logs through the conversation timeline

use chatline_engine::{
    load_records, render_transcript, replay, separator_label, Config, ConfigError,
    GroupingPolicy, ReplayError, Timestamp, DEFAULT_CONFIG_PATH,
};
use chrono::{DateTime, FixedOffset, Local, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Conversation timeline tools
#[derive(Parser)]
#[command(name = "chatline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file with default settings
    Init,

    /// Replay a JSON-lines message log and print the resulting timeline
    Replay {
        /// Path to the log file
        file: PathBuf,

        /// Output the timeline as JSON
        #[arg(long)]
        json: bool,

        /// Override the grouping window in seconds
        #[arg(long)]
        window_secs: Option<u64>,

        /// Reference time for labels, in ms since the epoch (default: now)
        #[arg(long, allow_negative_numbers = true)]
        now: Option<Timestamp>,
    },

    /// Print the separator label for a timestamp
    Label {
        /// Timestamp in ms since the epoch
        #[arg(allow_negative_numbers = true)]
        timestamp: Timestamp,

        /// Reference time in ms since the epoch (default: now)
        #[arg(long, allow_negative_numbers = true)]
        now: Option<Timestamp>,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Errors surfaced to the user.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Replay(#[from] ReplayError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let result = match cli.command {
        Commands::Init => cmd_init(&cli.config),
        Commands::Replay {
            file,
            json,
            window_secs,
            now,
        } => cmd_replay(&config, &file, json, window_secs, now),
        Commands::Label { timestamp, now } => cmd_label(&config, timestamp, now),
        Commands::Config { json } => cmd_config(&config, &cli.config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install the stderr log subscriber.
///
/// `CHATLINE_LOG` wins over the configured level.
fn init_tracing(config: &Config) {
    let filter = match EnvFilter::try_from_env("CHATLINE_LOG") {
        Ok(filter) => filter,
        Err(_) => config.log_level.parse::<EnvFilter>().unwrap_or_else(|e| {
            eprintln!(
                "WARN: log_level '{}' is not a valid tracing filter ({e}); falling back to 'warn'",
                config.log_level
            );
            EnvFilter::new("warn")
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_init(config_path: &Path) -> Result<(), CliError> {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    Config::default().save(config_path)?;
    println!("Created {}", config_path.display());
    Ok(())
}

fn cmd_replay(
    config: &Config,
    file: &Path,
    json: bool,
    window_secs: Option<u64>,
    now: Option<Timestamp>,
) -> Result<(), CliError> {
    let policy = window_secs.map_or_else(|| config.grouping_policy(), GroupingPolicy::from_seconds);
    let records = load_records(file)?;
    let timeline = replay(records, policy);

    if json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(());
    }

    let now = display_now(config, now)?;
    for line in render_transcript(&timeline, &now, &config.render_options()) {
        println!("{line}");
    }
    Ok(())
}

fn cmd_label(config: &Config, timestamp: Timestamp, now: Option<Timestamp>) -> Result<(), CliError> {
    let now = display_now(config, now)?;
    println!("{}", separator_label(timestamp, &now, &config.label_style()));
    Ok(())
}

fn cmd_config(config: &Config, path: &Path, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let source = if path.exists() { "file" } else { "defaults" };
    println!("Configuration ({source}: {})\n", path.display());
    println!("  Grouping window: {}s", config.grouping_window_seconds);
    println!("  Yesterday label: {}", config.yesterday_label);
    match config.utc_offset_minutes {
        Some(minutes) => println!("  Time zone: UTC{minutes:+} min"),
        None => println!("  Time zone: local"),
    }
    println!("  ASCII symbols: {}", config.ascii);
    println!("  Log level: {}", config.log_level);
    Ok(())
}

/// Reference time in the configured display zone.
fn display_now(config: &Config, now: Option<Timestamp>) -> Result<DateTime<FixedOffset>, CliError> {
    let utc = match now {
        Some(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| CliError::InvalidTime(format!("{ms} is out of range")))?,
        None => Utc::now(),
    };

    match config.utc_offset_minutes {
        Some(minutes) => {
            let offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| CliError::InvalidTime(format!("UTC offset {minutes} min")))?;
            Ok(utc.with_timezone(&offset))
        }
        None => Ok(utc.with_timezone(&Local).fixed_offset()),
    }
}
