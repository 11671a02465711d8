//! `cartera import` — read a spreadsheet, plan against the store, apply.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use cartera_core::row::RawRow;
use cartera_core::{Policy, Receivable};
use cartera_recon::{plan, Reconcilable, ReconPlan};

use crate::exit_codes::{EXIT_IMPORT, EXIT_STORE};
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import a cartera (receivables) sheet
    #[command(after_help = "\
Examples:
  cartera import receivables cartera_julio.xlsx
  cartera import receivables cartera.csv --dry-run")]
    Receivables(ImportArgs),

    /// Import a policy sheet
    Policies(ImportArgs),
}

#[derive(Args)]
pub struct ImportArgs {
    /// Spreadsheet file (.xlsx, .xls, .xlsb, .ods, .csv, .tsv)
    pub file: PathBuf,

    /// Plan only; do not write to the store
    #[arg(long)]
    pub dry_run: bool,

    /// Print the plan summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_import(ctx: &mut Context, cmd: ImportCommands) -> Result<(), CliError> {
    match cmd {
        ImportCommands::Receivables(args) => {
            let rows = read_rows(&args.file)?;
            let stored = ctx
                .store
                .load_receivables()
                .map_err(store_err)?;
            let plan = plan::<Receivable>(&stored, &rows);
            apply_and_report(ctx, &args, &plan, |ctx, plan, batch| {
                ctx.store.apply_receivables(plan, batch)
            })
        }
        ImportCommands::Policies(args) => {
            let rows = read_rows(&args.file)?;
            let stored = ctx.store.load_policies().map_err(store_err)?;
            let plan = plan::<Policy>(&stored, &rows);
            apply_and_report(ctx, &args, &plan, |ctx, plan, batch| {
                ctx.store.apply_policies(plan, batch)
            })
        }
    }
}

/// Decode the file by extension.
fn read_rows(path: &Path) -> Result<Vec<RawRow>, CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let result = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => cartera_io::xlsx::read_rows(path),
        "csv" | "tsv" | "txt" => cartera_io::csv::read_rows(path),
        other => {
            return Err(CliError::with_hint(
                EXIT_IMPORT,
                format!("unsupported file type: '{other}'"),
                "expected .xlsx, .xls, .xlsb, .ods, .csv or .tsv",
            ))
        }
    };

    result.map_err(|e| CliError::new(EXIT_IMPORT, format!("{}: {e}", path.display())))
}

fn apply_and_report<T, F>(
    ctx: &mut Context,
    args: &ImportArgs,
    plan: &ReconPlan<T>,
    apply: F,
) -> Result<(), CliError>
where
    T: Reconcilable,
    F: FnOnce(&mut Context, &ReconPlan<T>, usize) -> Result<(), cartera_store::StoreError>,
{
    if !args.dry_run {
        let batch = ctx.settings.store.batch_size;
        apply(ctx, plan, batch).map_err(store_err)?;
    }

    if args.json {
        let json = serde_json::to_string_pretty(&plan.summary)
            .map_err(|e| CliError::new(EXIT_IMPORT, e.to_string()))?;
        println!("{json}");
    }

    let action = if args.dry_run { "planned" } else { "applied" };
    eprintln!("{action}: {}", plan.summary);
    Ok(())
}

fn store_err(e: cartera_store::StoreError) -> CliError {
    CliError::new(EXIT_STORE, e.to_string())
}
