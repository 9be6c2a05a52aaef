//! keeplist CLI
//!
//! Command-line interface for keeplist - task and note boards.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use keeplist_core::{
    Board, Config, FileStore, KeyValueStore, LoadReport, MemoryStore, StatusFilter, Variant,
};

mod commands;
mod editor;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "keeplist")]
#[command(about = "keeplist - local task and note boards")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Board to use: tasks or notes (defaults to the configured variant)
    #[arg(long, global = true)]
    variant: Option<Variant>,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep records in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new task or note
    #[command(alias = "create")]
    Add {
        /// Title
        title: String,
        /// Description / content
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Edit a record's title and body (opens $EDITOR without flags)
    Edit {
        /// Record ID (full id or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Move a record to the trash
    #[command(alias = "rm")]
    Delete {
        /// Record ID (full id or prefix)
        id: String,
    },
    /// Restore a record from the trash
    Restore {
        /// Record ID (full id or prefix)
        id: String,
    },
    /// Archive a note, or unarchive it if already archived
    #[command(alias = "unarchive")]
    Archive {
        /// Record ID (full id or prefix)
        id: String,
    },
    /// Mark a task complete
    #[command(alias = "done")]
    Complete {
        /// Record ID (full id or prefix)
        id: String,
    },
    /// List records
    #[command(alias = "ls")]
    List {
        /// Status to show, or "all" (defaults to in-progress / active)
        #[arg(short, long)]
        status: Option<StatusFilter>,
        /// Case-insensitive search in title and body
        #[arg(short = 'S', long)]
        search: Option<String>,
    },
    /// Show a single record
    Show {
        /// Record ID (full id or prefix)
        id: String,
    },
    /// Show record counts per status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, variant, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need a board
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config =
        Config::load_with_cli_override(cli.config.as_ref()).context("Failed to load configuration")?;
    logging::init(&config);

    let variant = cli.variant.unwrap_or(config.variant);
    let mut board = open_board(&config, variant, cli.memory, &output)?;

    match cli.command {
        Commands::Add { title, body } => commands::record::add(&mut board, title, body, &output),
        Commands::Edit { id, title, body } => {
            commands::record::edit(&mut board, id, title, body, &output)
        }
        Commands::Delete { id } => commands::record::delete(&mut board, id, &output),
        Commands::Restore { id } => commands::record::restore(&mut board, id, &output),
        Commands::Archive { id } => commands::record::archive(&mut board, id, &output),
        Commands::Complete { id } => commands::record::complete(&mut board, id, &output),
        Commands::List { status, search } => {
            commands::record::list(&board, status, search, &output)
        }
        Commands::Show { id } => commands::record::show(&board, id, &output),
        Commands::Status => commands::status::show(&board, &config, cli.memory, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Open the board for `variant`, reporting unreadable stored data
fn open_board(config: &Config, variant: Variant, in_memory: bool, output: &Output) -> Result<Board> {
    let backend: Box<dyn KeyValueStore> = if in_memory {
        Box::new(MemoryStore::new())
    } else {
        let store = FileStore::open(config.data_dir.clone()).with_context(|| {
            format!("Failed to open data directory: {:?}", config.data_dir)
        })?;
        Box::new(store)
    };

    let (board, report) = Board::open(backend, variant);
    match report {
        LoadReport::Reset { reason, backup_key } => {
            output.warning(&format!(
                "Stored {} could not be read ({}); starting with an empty board",
                variant, reason
            ));
            match backup_key {
                Some(key) => {
                    output.warning(&format!("The unreadable data was kept under '{}'", key))
                }
                None => output.warning(&format!(
                    "Changes will not be saved until {:?} is moved or repaired",
                    config.board_path(variant)
                )),
            }
        }
        LoadReport::Loaded {
            skipped,
            backup_key,
            ..
        } if skipped > 0 => {
            output.warning(&format!(
                "Ignored {} unreadable record(s) in stored {}",
                skipped, variant
            ));
            match backup_key {
                Some(key) => output.warning(&format!("The original data was kept under '{}'", key)),
                None => output.warning("The original data could not be backed up; changes will not be saved"),
            }
        }
        report => debug!(?report, "Board opened"),
    }

    Ok(board)
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
