//! CLI argument parsing for the donation wizard.
//!
//! Every command drives the same `WizardController`; the CLI only chooses how
//! input arrives (interactive lines or flags) and which gateway commits.
use crate::config::GatewayKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "donate",
    version,
    about = "Three-step donation wizard: amount, donor details, payment",
    after_help = "Commands:\n  init                     Write a default config.json\n  tiers                    List preset donation amounts\n  run                      Walk through the wizard interactively\n  submit --amount <N> ...  Run the wizard from flags and commit\n\nExamples:\n  donate init\n  donate tiers --json\n  donate run --gateway http\n  donate submit --tier 1000 --name Asha --email a@x.com --payment upi\n  donate submit --amount 7500 --anonymous",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Path to config.json (defaults to $DONATE_CONFIG or the user config dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Emit debug logs on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Tiers(TiersArgs),
    Run(RunArgs),
    Submit(SubmitArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Write a default config.json")]
pub struct InitArgs {
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "List preset donation amounts and their impact")]
pub struct TiersArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Walk through the donation wizard interactively")]
pub struct RunArgs {
    /// Override the configured commit gateway
    #[arg(long, value_enum)]
    pub gateway: Option<GatewayKind>,
}

#[derive(Parser, Debug)]
#[command(about = "Run the wizard non-interactively from flags and commit")]
pub struct SubmitArgs {
    /// Preset tier amount to select
    #[arg(long, value_name = "N", conflicts_with = "amount")]
    pub tier: Option<u64>,

    /// Custom amount, typed as-is (non-digits are dropped)
    #[arg(long, value_name = "DIGITS")]
    pub amount: Option<String>,

    /// Make the donation monthly
    #[arg(long)]
    pub recurring: bool,

    /// Donate without name or email
    #[arg(long)]
    pub anonymous: bool,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub message: Option<String>,

    /// Payment channel: card, upi, netbanking, wallet
    #[arg(long, value_name = "METHOD")]
    pub payment: Option<String>,

    /// Override the configured commit gateway
    #[arg(long, value_enum)]
    pub gateway: Option<GatewayKind>,

    /// Emit the receipt as JSON
    #[arg(long)]
    pub json: bool,
}
