//! show-send - posting daemon
//!
//! Walks the script archive from a starting position and publishes one
//! transcript line at a time, persisting the cursor after every post.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use libshowcast::config::Config;
use libshowcast::cursor::{Cursor, CursorStore, ShowShape};
use libshowcast::error::{ConfigError, Result, ShowcastError};
use libshowcast::platforms::twitter::TwitterClient;
use libshowcast::platforms::Platform;
use libshowcast::poster::Poster;
use libshowcast::runner::Runner;
use libshowcast::{ScriptArchive, TwitterCredentials};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "show-send")]
#[command(version)]
#[command(about = "Posts a show's transcripts line by line on a schedule")]
#[command(long_about = "\
show-send - posting daemon

DESCRIPTION:
    show-send walks a season/episode script archive and publishes one
    transcript line at a time at a fixed interval, persisting its position
    to the state file after every post so it can resume after interruption.

    A failed post is retried at the same position after the recovery
    interval; the cursor only advances on success. The process exits on its
    own only once the configured show shape is exhausted.

USAGE:
    # Start after the last completed line (season 1, episode 2, line 41)
    show-send 1 2 41

    # Start an episode from the top (-1 = nothing completed yet)
    show-send 1 1 -1

    # Resume from the persisted cursor
    show-send continue

    # Post a single line, then exit (for cron-style driving)
    show-send continue --once

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown (finishes the current post)

CONFIGURATION:
    Configuration file: ~/.config/showcast/config.toml
    Override with SHOWCAST_CONFIG or --config.

    Credentials come from the environment: API_KEY, API_KEY_SECRET,
    ACCESS_TOKEN, ACCESS_TOKEN_SECRET.

EXIT CODES:
    0 - Clean shutdown (archive exhausted or signal)
    1 - Runtime error
    2 - Authentication error
    3 - Invalid arguments
")]
struct Cli {
    /// Starting position: SEASON EPISODE LAST_LINE, or the word "continue"
    #[arg(required = true, num_args = 1..=3, value_name = "POSITION")]
    #[arg(allow_negative_numbers = true)]
    position: Vec<String>,

    /// Path to the configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds between posts (overrides config)
    #[arg(long, value_name = "SECONDS")]
    tweet_interval: Option<u64>,

    /// Seconds before retrying a failed post (overrides config)
    #[arg(long, value_name = "SECONDS")]
    recovery_interval: Option<u64>,

    /// Process a single line, then exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Start {
    Resume,
    Explicit(Cursor),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Argument and configuration problems must surface before any
    // credential or network work.
    let start = parse_position(&cli.position)?;

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let archive_root = config.archive_root();
    if !archive_root.is_dir() {
        return Err(ConfigError::InvalidValue {
            field: "archive.root",
            reason: format!("not a directory: {}", archive_root.display()),
        }
        .into());
    }

    let store = CursorStore::new(config.state_file());
    let cursor = match start {
        Start::Resume => {
            let cursor = store.load()?;
            info!(%cursor, "resuming from state file");
            cursor
        }
        Start::Explicit(cursor) => cursor,
    };

    let credentials = TwitterCredentials::from_env()?;
    let mut platform = TwitterClient::new(credentials)?;
    if let Err(e) = platform.authenticate().await {
        // The loop retries dispatches anyway; revoked credentials show up
        // there as repeated failures rather than a startup abort.
        warn!(error = %e, "credential verification failed, continuing");
    } else {
        info!("credentials verified");
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let tweet_interval = cli
        .tweet_interval
        .unwrap_or(config.schedule.tweet_interval);
    let recovery_interval = cli
        .recovery_interval
        .unwrap_or(config.schedule.recovery_interval);
    info!(tweet_interval, recovery_interval, "intervals configured");

    let mut runner = Runner::new(
        ScriptArchive::new(archive_root),
        ShowShape::new(config.archive.seasons.clone()),
        store,
        Poster::new(Box::new(platform), config.twitter.dedup_space),
        cursor,
        Duration::from_secs(tweet_interval),
        Duration::from_secs(recovery_interval),
    )
    .with_shutdown(shutdown);

    if cli.once {
        runner.run_once().await
    } else {
        runner.run().await
    }
}

/// Interpret the positional arguments: `continue`, or three integers where
/// the line value is the index of the last *completed* line (-1 for none).
fn parse_position(args: &[String]) -> Result<Start> {
    match args {
        [word] if word == "continue" => Ok(Start::Resume),
        [season, episode, line] => {
            let season = parse_index(season, "SEASON")?;
            let episode = parse_index(episode, "EPISODE")?;
            let line: i64 = line.parse().map_err(|_| {
                ShowcastError::InvalidInput(format!(
                    "LAST_LINE must be an integer >= -1, got '{}'",
                    line
                ))
            })?;
            if line < -1 {
                return Err(ShowcastError::InvalidInput(format!(
                    "LAST_LINE must be >= -1, got {}",
                    line
                )));
            }
            Ok(Start::Explicit(Cursor::new(season, episode, line)))
        }
        _ => Err(ShowcastError::InvalidInput(format!(
            "expected 'continue' or SEASON EPISODE LAST_LINE, got {} argument(s)",
            args.len()
        ))),
    }
}

fn parse_index(value: &str, name: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(ShowcastError::InvalidInput(format!(
            "{} must be a positive integer, got '{}'",
            name, value
        ))),
    }
}

/// Set up signal handlers for graceful shutdown
#[cfg(unix)]
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| ShowcastError::InvalidInput(format!("Signal setup failed: {}", e)))?;

    std::thread::spawn(move || {
        for signal in signals.forever() {
            match signal {
                SIGTERM | SIGINT => {
                    info!("received shutdown signal, stopping gracefully...");
                    shutdown.store(true, Ordering::Relaxed);
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn setup_signal_handlers(_shutdown: Arc<AtomicBool>) -> Result<()> {
    Ok(())
}
