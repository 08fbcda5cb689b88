use anyhow::Result;
use clap::Parser;
use donate::cli::{Command, RootArgs};
use donate::config::resolve_config_path;
use donate::workflow;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);
    let config_path = resolve_config_path(args.config.as_deref())?;

    match args.command {
        Command::Init(init) => workflow::run_init(&config_path, init),
        Command::Tiers(tiers) => workflow::run_tiers(&config_path, tiers),
        Command::Run(run) => workflow::run_interactive(&config_path, run),
        Command::Submit(submit) => workflow::run_submit(&config_path, submit),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "donate=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
