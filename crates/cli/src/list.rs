//! `cartera list` / `cartera summary` — classified views of the snapshot.

use clap::{Args, Subcommand, ValueEnum};

use cartera_core::classify::{
    financed_badges, financed_semaphore, policy_status, receivable_status, PolicyStatus,
    ReceivableStatus,
};
use cartera_core::dates::format_ymd;
use cartera_core::normalize_key;
use cartera_core::summary::{insurer_summary, receivable_summary};
use cartera_core::{Policy, Receivable};

use crate::exit_codes::{EXIT_ERROR, EXIT_STORE};
use crate::{CliError, Context};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReceivableStatusFilter {
    Current,
    Upcoming,
    Overdue,
    Collected,
    Void,
}

impl ReceivableStatusFilter {
    fn matches(self, status: ReceivableStatus) -> bool {
        matches!(
            (self, status),
            (Self::Current, ReceivableStatus::Current)
                | (Self::Upcoming, ReceivableStatus::Upcoming)
                | (Self::Overdue, ReceivableStatus::Overdue)
                | (Self::Collected, ReceivableStatus::Collected)
                | (Self::Void, ReceivableStatus::Void)
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyStatusFilter {
    Current,
    Upcoming,
    Expired,
    NoDate,
    Voided,
}

impl PolicyStatusFilter {
    fn matches(self, status: PolicyStatus) -> bool {
        matches!(
            (self, status),
            (Self::Current, PolicyStatus::Current)
                | (Self::Upcoming, PolicyStatus::Upcoming)
                | (Self::Expired, PolicyStatus::Expired)
                | (Self::NoDate, PolicyStatus::NoDate)
                | (Self::Voided, PolicyStatus::Voided)
        )
    }
}

/// Follow-up note filter: records resolved with a plain yes, or carrying
/// free text.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotesFilter {
    Si,
    Text,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenewalFilter {
    Si,
    No,
}

#[derive(Args)]
pub struct ReceivableFilterArgs {
    /// Keep one status bucket
    #[arg(long, value_enum)]
    pub status: Option<ReceivableStatusFilter>,

    /// Keep one insurer (normalized match)
    #[arg(long)]
    pub insurer: Option<String>,

    /// Substring match over client, policy, plate and document
    #[arg(long)]
    pub search: Option<String>,

    /// Keep records by follow-up note state
    #[arg(long, value_enum)]
    pub notes: Option<NotesFilter>,
}

#[derive(Args)]
pub struct PolicyFilterArgs {
    /// Keep one status bucket
    #[arg(long, value_enum)]
    pub status: Option<PolicyStatusFilter>,

    /// Keep one insurer (normalized match)
    #[arg(long)]
    pub insurer: Option<String>,

    /// Substring match over policy, plate, holder, insured and their ids
    #[arg(long)]
    pub search: Option<String>,

    /// Keep records by renewal flag
    #[arg(long, value_enum)]
    pub renewal: Option<RenewalFilter>,
}

pub fn filter_receivables<'a>(
    rows: &'a [Receivable],
    args: &ReceivableFilterArgs,
    ctx: &Context,
) -> Vec<(&'a Receivable, ReceivableStatus)> {
    let thresholds = ctx.settings.aging.thresholds();
    rows.iter()
        .filter(|r| match &args.insurer {
            Some(insurer) => normalize_key(&r.insurer) == normalize_key(insurer),
            None => true,
        })
        .filter(|r| match &args.search {
            Some(term) => {
                let term = normalize_key(term);
                [&r.client, &r.policy, &r.plate, &r.document]
                    .iter()
                    .any(|field| normalize_key(field).contains(&term))
            }
            None => true,
        })
        .filter(|r| match args.notes {
            Some(NotesFilter::Si) => r.is_resolved(),
            Some(NotesFilter::Text) => r.has_note(),
            None => true,
        })
        .map(|r| (r, receivable_status(r, ctx.today, &thresholds)))
        .filter(|(_, status)| args.status.map_or(true, |f| f.matches(*status)))
        .collect()
}

pub fn filter_policies<'a>(
    rows: &'a [Policy],
    args: &PolicyFilterArgs,
    ctx: &Context,
) -> Vec<(&'a Policy, PolicyStatus)> {
    let window = ctx.settings.aging.expiry_window_days;
    rows.iter()
        .filter(|p| match &args.insurer {
            Some(insurer) => normalize_key(&p.insurer) == normalize_key(insurer),
            None => true,
        })
        .filter(|p| match &args.search {
            Some(term) => {
                let term = normalize_key(term);
                [
                    &p.policy,
                    &p.plate,
                    &p.holder,
                    &p.holder_id,
                    &p.insured,
                    &p.insured_id,
                ]
                .iter()
                .any(|field| normalize_key(field).contains(&term))
            }
            None => true,
        })
        .filter(|p| match args.renewal {
            Some(RenewalFilter::Si) => p.renewal.is_yes(),
            Some(RenewalFilter::No) => !p.renewal.is_yes(),
            None => true,
        })
        .map(|p| (p, policy_status(p, ctx.today, window)))
        .filter(|(_, status)| args.status.map_or(true, |f| f.matches(*status)))
        .collect()
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ListCommands {
    /// Receivables with their aging status
    Receivables(ReceivableFilterArgs),

    /// Policies with their expiry status
    Policies(PolicyFilterArgs),

    /// Financed policies with semaphore and badges
    Financed,
}

pub fn cmd_list(ctx: &Context, cmd: ListCommands) -> Result<(), CliError> {
    match cmd {
        ListCommands::Receivables(args) => {
            let stored = ctx.store.load_receivables().map_err(store_err)?;
            let rows: Vec<Receivable> = stored.into_iter().map(|s| s.record).collect();
            let view = filter_receivables(&rows, &args, ctx);

            println!(
                "{:<10} {:<14} {:<14} {:<28} {:>14} {:<12} {}",
                "STATUS", "INSURER", "POLICY", "CLIENT", "VALUE", "ISSUED", "NOTES"
            );
            for (r, status) in &view {
                println!(
                    "{:<10} {:<14} {:<14} {:<28} {:>14.0} {:<12} {}",
                    status.to_string(),
                    r.insurer,
                    r.policy,
                    r.client,
                    r.amount_value(),
                    format_ymd(r.issue_date),
                    r.notes,
                );
            }
            eprintln!("{} record(s)", view.len());
            Ok(())
        }
        ListCommands::Policies(args) => {
            let stored = ctx.store.load_policies().map_err(store_err)?;
            let rows: Vec<Policy> = stored.into_iter().map(|s| s.record).collect();
            let view = filter_policies(&rows, &args, ctx);

            println!(
                "{:<10} {:<14} {:<14} {:<24} {:<12} {:>14} {:<4} {}",
                "STATUS", "INSURER", "POLICY", "HOLDER", "ENDS", "TOTAL", "REN", "PHONE"
            );
            for (p, status) in &view {
                println!(
                    "{:<10} {:<14} {:<14} {:<24} {:<12} {:>14.0} {:<4} {}",
                    status.to_string(),
                    p.insurer,
                    p.policy,
                    p.holder,
                    format_ymd(p.ends_on),
                    p.total,
                    p.renewal.to_string(),
                    p.phone,
                );
            }
            eprintln!("{} record(s)", view.len());
            Ok(())
        }
        ListCommands::Financed => {
            let rows = ctx.store.list_financed().map_err(store_err)?;

            println!(
                "{:<8} {:<14} {:<14} {:<20} {:<12} {}",
                "STATE", "POLICY", "INSURER", "CLIENT", "ENDORSEMENT", "BADGES"
            );
            for p in &rows {
                let badges: Vec<String> = financed_badges(p)
                    .iter()
                    .map(|b| b.to_string())
                    .collect();
                println!(
                    "{:<8} {:<14} {:<14} {:<20} {:<12} {}",
                    financed_semaphore(p).to_string(),
                    p.policy,
                    p.insurer,
                    p.client,
                    p.endorsement.to_string(),
                    badges.join(", "),
                );
            }
            eprintln!("{} record(s)", rows.len());
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum SummaryCommands {
    /// Aging and follow-up tallies for receivables
    Receivables {
        /// Keep one insurer (normalized match)
        #[arg(long)]
        insurer: Option<String>,

        /// Print as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Per-insurer rollup for policies
    Policies {
        /// Print as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_summary(ctx: &Context, cmd: SummaryCommands) -> Result<(), CliError> {
    match cmd {
        SummaryCommands::Receivables { insurer, json } => {
            let stored = ctx.store.load_receivables().map_err(store_err)?;
            let rows: Vec<Receivable> = stored
                .into_iter()
                .map(|s| s.record)
                .filter(|r| match &insurer {
                    Some(i) => normalize_key(&r.insurer) == normalize_key(i),
                    None => true,
                })
                .collect();

            let s = receivable_summary(&rows, ctx.today, &ctx.settings.aging.thresholds());

            if json {
                println!("{}", to_json(&s)?);
                return Ok(());
            }
            println!("total      {}", s.total);
            println!("current    {}", s.current);
            println!("upcoming   {}", s.upcoming);
            println!("overdue    {}", s.overdue);
            println!("collected  {}", s.collected);
            println!("void       {}", s.void);
            println!("notes=si   {}", s.resolved_notes);
            println!("notes      {}", s.noted);
            println!("negatives  {} (total {:.0})", s.negatives, s.negatives_total);
            Ok(())
        }
        SummaryCommands::Policies { json } => {
            let stored = ctx.store.load_policies().map_err(store_err)?;
            let rows: Vec<Policy> = stored.into_iter().map(|s| s.record).collect();
            let summary = insurer_summary(&rows, ctx.today, ctx.settings.aging.expiry_window_days);

            if json {
                println!("{}", to_json(&summary)?);
                return Ok(());
            }
            println!(
                "{:<18} {:>6} {:>8} {:>9} {:>8} {:>7} {:>16} {:>16}",
                "INSURER", "TOTAL", "CURRENT", "UPCOMING", "EXPIRED", "VOIDED", "PREMIUM", "GRAND"
            );
            for s in &summary {
                println!(
                    "{:<18} {:>6} {:>8} {:>9} {:>8} {:>7} {:>16.0} {:>16.0}",
                    s.insurer,
                    s.records,
                    s.current,
                    s.upcoming,
                    s.expired,
                    s.voided,
                    s.premium_total,
                    s.grand_total,
                );
            }
            Ok(())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))
}

fn store_err(e: cartera_store::StoreError) -> CliError {
    CliError::new(EXIT_STORE, e.to_string())
}
