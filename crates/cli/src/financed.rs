//! `cartera financed` — the disbursement workflow.
//!
//! `set` walks the milestone chain in order and refuses a step whose
//! predecessor does not hold, naming the missing step — the command-line
//! equivalent of the grid disabling a checkbox.

use clap::{Args, Subcommand};

use cartera_core::dates::resolve_date_str;
use cartera_core::{Endorsement, FinancedPolicy};

use crate::exit_codes::{EXIT_STORE, EXIT_USAGE};
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum FinancedCommands {
    /// Add a financed policy
    #[command(after_help = "\
Examples:
  cartera financed add F-1001 --client 'Juan Perez' --entity Finesa --insurer SURA
  cartera financed set F-1001 --mounted true
  cartera financed set F-1001 --endorsement si --collected true")]
    Add(AddArgs),

    /// Update milestones and workflow fields
    Set(SetArgs),

    /// Remove a financed policy
    Rm {
        /// Policy number
        policy: String,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Policy number
    pub policy: String,

    #[arg(long, default_value = "")]
    pub client: String,

    /// Financing entity
    #[arg(long, default_value = "")]
    pub entity: String,

    #[arg(long, default_value = "")]
    pub insurer: String,

    #[arg(long, default_value = "")]
    pub plate: String,

    /// Policy date, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long, default_value = "")]
    pub amount: String,

    #[arg(long, default_value_t = 1)]
    pub installments: u32,

    #[arg(long, default_value = "")]
    pub manager: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Policy number
    pub policy: String,

    #[arg(long)]
    pub mounted: Option<bool>,

    #[arg(long)]
    pub collected: Option<bool>,

    #[arg(long)]
    pub signed: Option<bool>,

    #[arg(long)]
    pub disbursed: Option<bool>,

    /// Endorsement choice: si or no
    #[arg(long)]
    pub endorsement: Option<String>,

    #[arg(long)]
    pub certified: Option<bool>,

    #[arg(long)]
    pub delegated: Option<bool>,

    #[arg(long)]
    pub delegated_to: Option<String>,

    #[arg(long)]
    pub manager: Option<String>,
}

pub fn cmd_financed(ctx: &Context, cmd: FinancedCommands) -> Result<(), CliError> {
    match cmd {
        FinancedCommands::Add(args) => cmd_add(ctx, args),
        FinancedCommands::Set(args) => cmd_set(ctx, args),
        FinancedCommands::Rm { policy } => {
            let removed = ctx.store.delete_financed(&policy).map_err(store_err)?;
            if !removed {
                return Err(CliError::new(
                    EXIT_USAGE,
                    format!("no financed policy '{policy}'"),
                ));
            }
            eprintln!("removed {policy}");
            Ok(())
        }
    }
}

fn cmd_add(ctx: &Context, args: AddArgs) -> Result<(), CliError> {
    if args.policy.trim().is_empty() {
        return Err(CliError::new(EXIT_USAGE, "policy number is required"));
    }
    if ctx
        .store
        .get_financed(&args.policy)
        .map_err(store_err)?
        .is_some()
    {
        return Err(CliError::with_hint(
            EXIT_USAGE,
            format!("financed policy '{}' already exists", args.policy),
            "use `cartera financed set` to update it",
        ));
    }

    let date = match &args.date {
        Some(s) => Some(resolve_date_str(s).ok_or_else(|| {
            CliError::with_hint(
                EXIT_USAGE,
                format!("cannot parse --date value '{s}'"),
                "use YYYY-MM-DD",
            )
        })?),
        None => None,
    };

    let record = FinancedPolicy {
        policy: args.policy.trim().to_string(),
        date,
        plate: args.plate,
        client: args.client,
        entity: args.entity,
        insurer: args.insurer,
        manager: args.manager,
        installments: args.installments,
        amount: args.amount,
        ..FinancedPolicy::default()
    };
    ctx.store.upsert_financed(&record).map_err(store_err)?;
    eprintln!("added {}", record.policy);
    Ok(())
}

fn cmd_set(ctx: &Context, args: SetArgs) -> Result<(), CliError> {
    let mut p = ctx
        .store
        .get_financed(&args.policy)
        .map_err(store_err)?
        .ok_or_else(|| {
            CliError::with_hint(
                EXIT_USAGE,
                format!("no financed policy '{}'", args.policy),
                "use `cartera financed add` first",
            )
        })?;

    // Order matters: each step is validated against the state left by the
    // previous assignments, so one command can walk several steps at once.
    if let Some(v) = args.mounted {
        p.mounted = v;
    }
    if let Some(v) = args.collected {
        if v && !p.may_collect() {
            return Err(chain_err("collected", "mounted"));
        }
        p.collected = v;
    }
    if let Some(v) = args.signed {
        if v && !p.may_sign() {
            return Err(chain_err("signed", "collected"));
        }
        p.signed = v;
    }
    if let Some(v) = args.disbursed {
        if v && !p.may_disburse() {
            return Err(chain_err("disbursed", "mounted, collected and signed"));
        }
        p.disbursed = v;
    }
    if let Some(ref v) = args.endorsement {
        p.endorsement = match Endorsement::parse(v) {
            Endorsement::Unset => {
                return Err(CliError::with_hint(
                    EXIT_USAGE,
                    format!("cannot parse --endorsement value '{v}'"),
                    "use si or no",
                ))
            }
            choice => choice,
        };
    }
    if let Some(v) = args.certified {
        if v && !p.may_certify() {
            return Err(CliError::with_hint(
                EXIT_USAGE,
                "certification requires a disbursed policy with endorsement = si",
                "set --disbursed true and --endorsement si first",
            ));
        }
        p.certified = v;
    }
    if let Some(v) = args.delegated {
        p.delegated = v;
    }
    if let Some(v) = args.delegated_to {
        p.delegated_to = v;
    }
    if let Some(v) = args.manager {
        p.manager = v;
    }

    ctx.store.upsert_financed(&p).map_err(store_err)?;

    let badges: Vec<String> = cartera_core::classify::financed_badges(&p)
        .iter()
        .map(|b| b.to_string())
        .collect();
    eprintln!(
        "{}: {} [{}]",
        p.policy,
        cartera_core::classify::financed_semaphore(&p),
        badges.join(", "),
    );
    Ok(())
}

fn chain_err(step: &str, requires: &str) -> CliError {
    CliError::with_hint(
        EXIT_USAGE,
        format!("cannot set {step}: predecessor step not done"),
        format!("{requires} must be set first"),
    )
}

fn store_err(e: cartera_store::StoreError) -> CliError {
    CliError::new(EXIT_STORE, e.to_string())
}
