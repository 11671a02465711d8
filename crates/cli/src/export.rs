//! `cartera export` — write classified views back to Excel.
//!
//! Exports exactly what the matching list command shows: same filters, same
//! derived fields.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use cartera_core::summary::insurer_summary;
use cartera_core::{Policy, Receivable};

use crate::exit_codes::{EXIT_EXPORT, EXIT_STORE};
use crate::list::{filter_policies, filter_receivables, PolicyFilterArgs, ReceivableFilterArgs};
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the filtered receivable view
    #[command(after_help = "\
Examples:
  cartera export receivables cartera_exportada.xlsx
  cartera export receivables vencidas.xlsx --status overdue")]
    Receivables(ExportReceivablesArgs),

    /// Export the filtered policy view
    Policies(ExportPoliciesArgs),

    /// Export the per-insurer rollup
    Summary {
        /// Output file (.xlsx)
        out: PathBuf,
    },
}

#[derive(Args)]
pub struct ExportReceivablesArgs {
    /// Output file (.xlsx)
    pub out: PathBuf,

    #[command(flatten)]
    pub filters: ReceivableFilterArgs,
}

#[derive(Args)]
pub struct ExportPoliciesArgs {
    /// Output file (.xlsx)
    pub out: PathBuf,

    #[command(flatten)]
    pub filters: PolicyFilterArgs,
}

pub fn cmd_export(ctx: &Context, cmd: ExportCommands) -> Result<(), CliError> {
    match cmd {
        ExportCommands::Receivables(args) => {
            let stored = ctx.store.load_receivables().map_err(store_err)?;
            let rows: Vec<Receivable> = stored.into_iter().map(|s| s.record).collect();
            let view = filter_receivables(&rows, &args.filters, ctx);

            cartera_io::xlsx::write_receivables(&args.out, &view)
                .map_err(|e| export_err(&args.out, e))?;
            eprintln!("wrote {} record(s) to {}", view.len(), args.out.display());
            Ok(())
        }
        ExportCommands::Policies(args) => {
            let stored = ctx.store.load_policies().map_err(store_err)?;
            let rows: Vec<Policy> = stored.into_iter().map(|s| s.record).collect();
            let view = filter_policies(&rows, &args.filters, ctx);

            cartera_io::xlsx::write_policies(&args.out, &view)
                .map_err(|e| export_err(&args.out, e))?;
            eprintln!("wrote {} record(s) to {}", view.len(), args.out.display());
            Ok(())
        }
        ExportCommands::Summary { out } => {
            let stored = ctx.store.load_policies().map_err(store_err)?;
            let rows: Vec<Policy> = stored.into_iter().map(|s| s.record).collect();
            let summary = insurer_summary(&rows, ctx.today, ctx.settings.aging.expiry_window_days);

            cartera_io::xlsx::write_insurer_summary(&out, &summary)
                .map_err(|e| export_err(&out, e))?;
            eprintln!("wrote {} insurer(s) to {}", summary.len(), out.display());
            Ok(())
        }
    }
}

fn export_err(path: &std::path::Path, e: String) -> CliError {
    CliError::new(EXIT_EXPORT, format!("{}: {e}", path.display()))
}

fn store_err(e: cartera_store::StoreError) -> CliError {
    CliError::new(EXIT_STORE, e.to_string())
}
