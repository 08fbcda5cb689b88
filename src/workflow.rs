//! Command handlers: each loads config, builds a controller and gateway, and
//! drives the wizard.
use crate::cli::{InitArgs, RunArgs, SubmitArgs, TiersArgs};
use crate::commit::CommitGateway;
use crate::config::{self, DonateConfig};
use crate::session::{Session, SessionOutcome};
use crate::wizard::{
    DonationReceipt, PaymentMethod, SuccessCallback, WizardController, WizardError,
};
use anyhow::{anyhow, Context, Result};
use std::io;
use std::path::Path;

pub fn run_init(config_path: &Path, args: InitArgs) -> Result<()> {
    if config_path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    config::write_config(config_path, &config::default_config())?;
    println!("wrote {}", config_path.display());
    Ok(())
}

pub fn run_tiers(config_path: &Path, args: TiersArgs) -> Result<()> {
    let config = config::load_config(config_path)?;
    if args.json {
        let text = serde_json::to_string_pretty(&config.tiers).context("serialize tiers")?;
        println!("{text}");
        return Ok(());
    }
    for (idx, tier) in config.tiers.iter().enumerate() {
        println!(
            "[{}] {:<10} {}",
            idx + 1,
            config.format_amount(tier.amount),
            tier.impact
        );
    }
    Ok(())
}

pub fn run_interactive(config_path: &Path, args: RunArgs) -> Result<()> {
    let config = config::load_config(config_path)?;
    let mut gateway = config.build_gateway(args.gateway);
    tracing::debug!(gateway = gateway.name(), "interactive session");
    let controller = WizardController::new(config.tiers.clone(), thank_you(&config));
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        controller,
        &config,
        gateway.as_mut(),
        stdin.lock(),
        stdout.lock(),
    );
    match session.run()? {
        SessionOutcome::Donated(receipt) => {
            if let Some(id) = receipt.commit.donation_id.as_deref() {
                println!("Reference: {id}");
            }
        }
        SessionOutcome::Quit => println!("No donation made."),
    }
    Ok(())
}

pub fn run_submit(config_path: &Path, args: SubmitArgs) -> Result<()> {
    let config = config::load_config(config_path)?;
    let mut gateway = config.build_gateway(args.gateway);
    let on_success: SuccessCallback = if args.json {
        Box::new(|_: &str, _: u64| {})
    } else {
        thank_you(&config)
    };
    let mut controller = WizardController::new(config.tiers.clone(), on_success);
    let receipt = submit_from_args(&mut controller, &args, gateway.as_mut())?;
    if args.json {
        let text = serde_json::to_string_pretty(&receipt).context("serialize receipt")?;
        println!("{text}");
    }
    Ok(())
}

/// Fill each step from flags, passing every gate in order, then commit.
pub fn submit_from_args(
    controller: &mut WizardController,
    args: &SubmitArgs,
    gateway: &mut dyn CommitGateway,
) -> Result<DonationReceipt, WizardError> {
    {
        let mut amount = controller.amount_mut()?;
        if let Some(tier) = args.tier {
            amount
                .select_preset(tier)
                .ok_or(WizardError::UnknownTier(tier))?;
        } else if let Some(text) = args.amount.as_deref() {
            let rejected = amount.set_custom(text);
            if rejected > 0 {
                tracing::warn!(rejected, "dropped non-digit characters from amount");
            }
        }
        amount.set_recurring(args.recurring);
    }
    controller.advance()?;

    {
        let mut donor = controller.donor_mut()?;
        donor.set_anonymous(args.anonymous);
        if let Some(name) = args.name.as_deref() {
            donor.set_name(name);
        }
        if let Some(email) = args.email.as_deref() {
            donor.set_email(email);
        }
        if let Some(phone) = args.phone.as_deref() {
            donor.set_phone(phone);
        }
        if let Some(message) = args.message.as_deref() {
            donor.set_message(message);
        }
    }
    controller.advance()?;

    if let Some(method) = args.payment.as_deref() {
        let method = PaymentMethod::parse(method)
            .ok_or_else(|| WizardError::UnknownPaymentMethod(method.to_string()))?;
        controller.payment_mut()?.select(method);
    }
    controller.submit(gateway)
}

fn thank_you(config: &DonateConfig) -> SuccessCallback {
    let config = config.clone();
    Box::new(move |name: &str, amount: u64| {
        println!(
            "Thank you, {name}! Donation of {} received.",
            config.format_amount(amount)
        );
    })
}
