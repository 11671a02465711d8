// cartera CLI - headless portfolio operations
//
// Imports spreadsheet exports into the store (reconciling against what is
// already there), lists and summarizes the classified views, exports them
// back to Excel, and drives the financed-policy workflow.

mod export;
mod financed;
mod import;
mod list;

pub mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use cartera_config::Settings;
use cartera_core::dates::resolve_date_str;
use cartera_store::Store;

use exit_codes::{EXIT_STORE, EXIT_SUCCESS, EXIT_USAGE};

// ---------------------------------------------------------------------------
// Error + shared context
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(code: u8, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// Everything a command needs: settings, an open store, and the injected
/// "today". The system clock is read exactly once, here.
pub struct Context {
    pub settings: Settings,
    pub store: Store,
    pub today: NaiveDate,
}

impl Context {
    fn build(db: Option<PathBuf>, today: Option<String>) -> Result<Self, CliError> {
        let settings = Settings::load().map_err(|e| CliError::new(EXIT_USAGE, e))?;

        let today = match today {
            Some(ref s) => resolve_date_str(s).ok_or_else(|| {
                CliError::with_hint(
                    EXIT_USAGE,
                    format!("cannot parse --today value '{s}'"),
                    "use YYYY-MM-DD",
                )
            })?,
            None => chrono::Local::now().date_naive(),
        };

        let db_path = db.unwrap_or_else(|| settings.db_path());
        let store = Store::open(&db_path).map_err(|e| CliError::new(EXIT_STORE, e.to_string()))?;

        Ok(Self {
            settings,
            store,
            today,
        })
    }
}

// ---------------------------------------------------------------------------
// Argument surface
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "cartera")]
#[command(about = "Insurance portfolio store: import, classify, export")]
#[command(version)]
struct Cli {
    /// Database file (defaults to the configured store path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Classification date, YYYY-MM-DD (defaults to the system date)
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a spreadsheet export, reconciling against the store
    #[command(subcommand)]
    Import(import::ImportCommands),

    /// List classified records
    #[command(subcommand)]
    List(list::ListCommands),

    /// Summarize a snapshot
    #[command(subcommand)]
    Summary(list::SummaryCommands),

    /// Export classified views to Excel
    #[command(subcommand)]
    Export(export::ExportCommands),

    /// Track financed policies through the disbursement workflow
    #[command(subcommand)]
    Financed(financed::FinancedCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut ctx = Context::build(cli.db, cli.today)?;

    match cli.command {
        Commands::Import(cmd) => import::cmd_import(&mut ctx, cmd),
        Commands::List(cmd) => list::cmd_list(&ctx, cmd),
        Commands::Summary(cmd) => list::cmd_summary(&ctx, cmd),
        Commands::Export(cmd) => export::cmd_export(&ctx, cmd),
        Commands::Financed(cmd) => financed::cmd_financed(&ctx, cmd),
    }
}
