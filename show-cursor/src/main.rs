//! show-cursor - inspect and correct the persisted playback position
//!
//! The state file is plain text and can be edited by hand; this tool does
//! the same job with the bounds checks applied.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use libshowcast::config::Config;
use libshowcast::cursor::{Cursor, CursorStore};
use libshowcast::error::{Result, ShowcastError};

#[derive(Parser, Debug)]
#[command(name = "show-cursor")]
#[command(version)]
#[command(about = "Inspect and correct the persisted playback position")]
#[command(long_about = "\
show-cursor - inspect and correct the persisted playback position

DESCRIPTION:
    show-cursor reads and writes the cursor state file used by show-send.
    The file holds three space-separated integers (season, episode, index
    of the last completed line) and can also be edited by hand; this tool
    applies the same bounds checks show-send uses when loading it.

USAGE EXAMPLES:
    # Print the current position
    show-cursor show

    # Print it as JSON
    show-cursor show --format json

    # Rewind to the start of season 2, episode 3
    show-cursor set 2 3 -1

EXIT CODES:
    0 - Success
    1 - State file missing, malformed, or unwritable
    3 - Invalid input
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Path to the state file (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    state_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the persisted cursor
    Show {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Overwrite the persisted cursor
    Set {
        /// 1-based season number
        season: u32,
        /// 1-based episode number
        episode: u32,
        /// 0-based index of the last completed line (-1 for none)
        #[arg(allow_negative_numbers = true)]
        line: i64,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = CursorStore::new(resolve_state_file(&cli)?);

    match cli.command {
        Commands::Show { format } => cmd_show(&store, &format),
        Commands::Set {
            season,
            episode,
            line,
        } => cmd_set(&store, season, episode, line),
    }
}

fn resolve_state_file(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.state_file {
        return Ok(path.clone());
    }
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config.state_file())
}

fn cmd_show(store: &CursorStore, format: &str) -> Result<()> {
    let cursor = store.load()?;

    match format {
        "json" => {
            let json = serde_json::json!({
                "season": cursor.season,
                "episode": cursor.episode,
                "line": cursor.line,
            });
            println!("{}", json);
        }
        "text" => println!("{}", cursor),
        other => {
            return Err(ShowcastError::InvalidInput(format!(
                "Invalid format '{}'. Must be 'text' or 'json'",
                other
            )));
        }
    }

    Ok(())
}

fn cmd_set(store: &CursorStore, season: u32, episode: u32, line: i64) -> Result<()> {
    if season < 1 || episode < 1 {
        return Err(ShowcastError::InvalidInput(
            "season and episode are 1-based".to_string(),
        ));
    }
    if line < -1 {
        return Err(ShowcastError::InvalidInput(format!(
            "line must be >= -1, got {}",
            line
        )));
    }

    let cursor = Cursor::new(season, episode, line);
    store.save(&cursor)?;
    println!("{}", cursor);
    Ok(())
}
