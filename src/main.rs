// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use bibliotrack::app_config::{self, Config, StorageBackendKind};
use bibliotrack::app_controller::{Controller, ExportFormat, RemoveTarget};
use bibliotrack::export::format_local_datetime;
use bibliotrack::inventory::{Coleccion, InventorySession, Sede};

/// CLI Wrapper for Sede to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSede {
    Medellin,
    Oriente,
    Uraba,
}

impl From<CliSede> for Sede {
    fn from(cli_sede: CliSede) -> Self {
        match cli_sede {
            CliSede::Medellin => Sede::Medellin,
            CliSede::Oriente => Sede::Oriente,
            CliSede::Uraba => Sede::Uraba,
        }
    }
}

/// CLI Wrapper for Coleccion to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliColeccion {
    Libros,
    Revistas,
    Folletos,
    TdgFisicos,
    Cds,
    Normas,
}

impl From<CliColeccion> for Coleccion {
    fn from(cli_coleccion: CliColeccion) -> Self {
        match cli_coleccion {
            CliColeccion::Libros => Coleccion::Libros,
            CliColeccion::Revistas => Coleccion::Revistas,
            CliColeccion::Folletos => Coleccion::Folletos,
            CliColeccion::TdgFisicos => Coleccion::TdgFisicos,
            CliColeccion::Cds => Coleccion::Cds,
            CliColeccion::Normas => Coleccion::Normas,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ExportFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliExportFormat {
    Csv,
    Email,
    Share,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli_format: CliExportFormat) -> Self {
        match cli_format {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Email => ExportFormat::Email,
            CliExportFormat::Share => ExportFormat::Share,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new inventory session
    New {
        /// Session name, e.g. the shelf or room being counted
        name: String,

        /// Site (defaults to the configured one)
        #[arg(short, long, value_enum)]
        sede: Option<CliSede>,

        /// Collection type (defaults to the configured one)
        #[arg(short, long, value_enum)]
        coleccion: Option<CliColeccion>,
    },

    /// List sessions, most recently updated first
    List,

    /// Show a session and its items
    Show {
        /// Session id or unique prefix
        session_id: String,
    },

    /// Read barcodes from stdin, one per line, until EOF
    Scan {
        /// Session id or unique prefix
        session_id: String,
    },

    /// Add barcodes typed on the command line
    Add {
        /// Session id or unique prefix
        session_id: String,

        /// Barcodes to record, in order
        #[arg(required = true)]
        barcodes: Vec<String>,
    },

    /// Remove one item from a session
    Remove {
        /// Session id or unique prefix
        session_id: String,

        /// Id of the item to remove
        #[arg(long, conflicts_with = "timestamp", required_unless_present = "timestamp")]
        item_id: Option<String>,

        /// Timestamp (ms) of a legacy item without id
        #[arg(long)]
        timestamp: Option<i64>,
    },

    /// Delete a session and all its items
    Delete {
        /// Session id or unique prefix
        session_id: String,
    },

    /// Export a session
    Export {
        /// Session id or unique prefix
        session_id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: CliExportFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate an AI summary of a session
    Report {
        /// Session id or unique prefix
        session_id: String,
    },

    /// Generate shell completions for bibliotrack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Bibliotrack - library inventory logging
///
/// Record the barcodes of a library collection, one session per site and
/// collection type, and export the result.
#[derive(Parser, Debug)]
#[command(name = "bibliotrack")]
#[command(version)]
#[command(about = "Library inventory logging tool")]
#[command(long_about = "Bibliotrack records library inventories: create a session for a site and collection, scan barcodes into it, then export or summarize it.

EXAMPLES:
    bibliotrack new \"Sala 2\" --sede oriente --coleccion libros
    bibliotrack list
    bibliotrack scan 3f2a < barcodes.txt        # Record one barcode per line
    bibliotrack add 3f2a 9788437604947 A-0012   # Record typed barcodes
    bibliotrack remove 3f2a --item-id 7c1e...   # Remove one item
    bibliotrack export 3f2a -o sala2.csv        # Export as CSV
    bibliotrack export 3f2a --format share      # Print a WhatsApp link
    bibliotrack completions bash > bibliotrack.bash

CONFIGURATION:
    Configuration is stored in bibliotrack.json by default. You can specify a
    different config file with --config. If the config file doesn't exist, a
    default one will be created automatically.

SESSION IDS:
    Any unique prefix of a session id is accepted.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short = 'C', long = "config", default_value = "bibliotrack.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Directory holding the session data
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep sessions in memory only; nothing is written to disk
    #[arg(long, global = true)]
    ephemeral: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, marker) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with the most verbose level; the effective
    // level is applied through set_max_level once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "bibliotrack", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)?;
    let result = run_command(&controller, cli.command).await;
    controller.close()?;
    result
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&cli.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", cli.config_path);
        Config::load_or_create(config_path)?
    };

    // Override config with CLI options if provided
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = Some(data_dir.clone());
    }
    if cli.ephemeral {
        config.storage.backend = StorageBackendKind::Memory;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn print_session(session: &InventorySession) {
    println!("{}", session);
    println!("  id:       {}", session.id);
    println!("  created:  {}", format_local_datetime(session.created_at));
    println!("  updated:  {}", format_local_datetime(session.updated_at));
    for (index, item) in session.items.iter().enumerate() {
        println!(
            "  {:>4}  {}  {:<24} {}",
            index + 1,
            format_local_datetime(item.timestamp),
            item.barcode,
            item.stable_id().map(str::to_string).unwrap_or_else(|| format!("(ts {})", item.timestamp))
        );
    }
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::New { name, sede, coleccion } => {
            let session = controller.create_session(&name, sede.map(Into::into), coleccion.map(Into::into))?;
            info!("Created session {}", session);
            println!("{}", session.id);
        }
        Commands::List => {
            let sessions = controller.list_sessions();
            if sessions.is_empty() {
                info!("No sessions yet");
            }
            for session in sessions {
                println!("{}", session);
            }
        }
        Commands::Show { session_id } => {
            print_session(&controller.resolve_session(&session_id)?);
        }
        Commands::Scan { session_id } => {
            let stdin = std::io::stdin();
            let outcome = controller.scan(&session_id, stdin.lock())?;
            info!("Recorded {} scans; {} now has {} items", outcome.recorded, outcome.session.name, outcome.session.item_count());
        }
        Commands::Add { session_id, barcodes } => {
            let session = controller.add_barcodes(&session_id, &barcodes)?;
            info!("Session {} now has {} items", session.name, session.item_count());
        }
        Commands::Remove { session_id, item_id, timestamp } => {
            let target = match (item_id, timestamp) {
                (Some(id), _) => RemoveTarget::ItemId(id),
                (None, Some(ts)) => RemoveTarget::Timestamp(ts),
                (None, None) => anyhow::bail!("Either --item-id or --timestamp is required"),
            };
            let (session, removed) = controller.remove_item(&session_id, &target)?;
            if removed {
                info!("Removed item; {} items left", session.item_count());
            }
        }
        Commands::Delete { session_id } => {
            let session = controller.delete_session(&session_id)?;
            info!("Deleted session {}", session);
        }
        Commands::Export { session_id, format, output } => {
            match controller.export(&session_id, format.into(), output.as_deref())? {
                Some(text) => println!("{}", text.trim_end()),
                None => info!("Export written to {:?}", output.unwrap_or_default()),
            }
        }
        Commands::Report { session_id } => {
            println!("{}", controller.report(&session_id).await?);
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}
