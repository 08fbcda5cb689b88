//! Line-driven terminal front-end for the wizard.
//!
//! Reads one command per line and renders the current step after every
//! change. Generic over reader/writer so tests can script a whole session.
use crate::commit::CommitGateway;
use crate::config::DonateConfig;
use crate::wizard::{
    donor, DonationReceipt, DonorField, PaymentMethod, WizardController, WizardError, WizardStep,
};
use anyhow::Result;
use std::io::{self, BufRead, Write};

const UNKNOWN_METHOD: &str = "unknown payment method; choose card, upi, netbanking, or wallet";

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    Donated(DonationReceipt),
    Quit,
}

pub struct Session<'a, R, W> {
    controller: WizardController,
    config: &'a DonateConfig,
    gateway: &'a mut dyn CommitGateway,
    input: R,
    output: W,
}

enum Reply {
    Continue,
    Redraw,
    Finished(SessionOutcome),
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        controller: WizardController,
        config: &'a DonateConfig,
        gateway: &'a mut dyn CommitGateway,
        input: R,
        output: W,
    ) -> Self {
        Self {
            controller,
            config,
            gateway,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<SessionOutcome> {
        self.render()?;
        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(SessionOutcome::Quit);
            }
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            match self.dispatch(command) {
                Ok(Reply::Continue) => {}
                Ok(Reply::Redraw) => self.render()?,
                Ok(Reply::Finished(outcome)) => return Ok(outcome),
                Err(err) => match err.downcast::<WizardError>() {
                    Ok(err) => writeln!(self.output, "error: {err}")?,
                    Err(err) => return Err(err),
                },
            }
        }
    }

    /// Wizard errors are reported and the session continues; output errors end it.
    fn dispatch(&mut self, command: &str) -> Result<Reply> {
        let (verb, rest) = match command.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command, ""),
        };
        let verb = verb.to_ascii_lowercase();
        let verb = verb.as_str();
        match verb {
            "help" | "?" => {
                self.print(&help_text(self.controller.current_step()))?;
                return Ok(Reply::Continue);
            }
            "show" => return Ok(Reply::Redraw),
            "quit" | "exit" => return Ok(Reply::Finished(SessionOutcome::Quit)),
            "cancel" => {
                self.controller.cancel()?;
                self.print("Donation cancelled.")?;
                return Ok(Reply::Redraw);
            }
            "back" => {
                self.controller.back()?;
                return Ok(Reply::Redraw);
            }
            "next" => {
                self.controller.advance()?;
                return Ok(Reply::Redraw);
            }
            "step" => {
                let target = rest.parse::<u8>().ok().and_then(WizardStep::from_number);
                let Some(target) = target else {
                    self.print("usage: step <1|2|3>")?;
                    return Ok(Reply::Continue);
                };
                self.controller.go_to(target)?;
                return Ok(Reply::Redraw);
            }
            _ => {}
        }
        match self.controller.current_step() {
            WizardStep::Amount => self.dispatch_amount(verb, rest),
            WizardStep::Details => self.dispatch_details(verb, rest),
            WizardStep::Payment => self.dispatch_payment(verb, rest),
        }
    }

    fn dispatch_amount(&mut self, verb: &str, rest: &str) -> Result<Reply> {
        let mut selector = self.controller.amount_mut()?;
        match verb {
            "amount" if rest.is_empty() => {
                selector.clear_custom();
                Ok(Reply::Redraw)
            }
            "amount" => {
                let rejected = selector.set_custom(rest);
                if rejected > 0 {
                    let msg = format!("ignored {rejected} non-digit character(s)");
                    self.print(&msg)?;
                }
                Ok(Reply::Redraw)
            }
            "recurring" => {
                selector.toggle_recurring();
                Ok(Reply::Redraw)
            }
            _ => match verb.parse::<usize>() {
                Ok(choice) if choice >= 1 => {
                    selector
                        .select_index(choice - 1)
                        .ok_or(WizardError::UnknownTier(choice as u64))?;
                    Ok(Reply::Redraw)
                }
                _ => self.unknown(verb),
            },
        }
    }

    fn dispatch_details(&mut self, verb: &str, rest: &str) -> Result<Reply> {
        let mut collector = self.controller.donor_mut()?;
        let field = match verb {
            "anonymous" => {
                collector.toggle_anonymous();
                return Ok(Reply::Redraw);
            }
            "name" => DonorField::Name,
            "email" => DonorField::Email,
            "phone" => DonorField::Phone,
            "message" => DonorField::Message,
            _ => return self.unknown(verb),
        };
        collector.set_field(field, rest);
        Ok(Reply::Redraw)
    }

    fn dispatch_payment(&mut self, verb: &str, rest: &str) -> Result<Reply> {
        match verb {
            "pay" => {
                let mut selector = self.controller.payment_mut()?;
                let method = PaymentMethod::parse(rest).or_else(|| {
                    rest.parse::<usize>()
                        .ok()
                        .and_then(|idx| idx.checked_sub(1))
                        .and_then(|idx| selector.options().get(idx).copied())
                });
                match method {
                    Some(method) => {
                        selector.select(method);
                        Ok(Reply::Redraw)
                    }
                    None => {
                        self.print(UNKNOWN_METHOD)?;
                        Ok(Reply::Continue)
                    }
                }
            }
            "submit" => {
                self.print("Processing your donation...")?;
                let receipt = self.controller.submit(&mut *self.gateway)?;
                Ok(Reply::Finished(SessionOutcome::Donated(receipt)))
            }
            _ => self.unknown(verb),
        }
    }

    fn unknown(&mut self, verb: &str) -> Result<Reply> {
        let msg = format!("unknown command {verb:?} (type help)");
        self.print(&msg)?;
        Ok(Reply::Continue)
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    fn render(&mut self) -> Result<()> {
        let text = render_step(&self.controller, self.config);
        write!(self.output, "{text}")?;
        Ok(())
    }
}

/// Render the current step as plain text.
pub fn render_step(controller: &WizardController, config: &DonateConfig) -> String {
    let step = controller.current_step();
    let draft = controller.draft();
    let mut out = format!("\nStep {} of 3: {}\n", step.number(), step.title());
    match step {
        WizardStep::Amount => {
            let selected = controller.amount_input().selected_tier();
            for (idx, tier) in controller.tiers().iter().enumerate() {
                let marker = if selected == Some(idx) { '*' } else { ' ' };
                out.push_str(&format!(
                    " {marker}[{}] {:<10} {}\n",
                    idx + 1,
                    config.format_amount(tier.amount),
                    tier.impact
                ));
            }
            out.push_str(&format!(
                "  custom amount: {}\n",
                controller.amount_input().custom_text()
            ));
            out.push_str(&format!(
                "  monthly: {}\n",
                if draft.is_recurring { "yes" } else { "no" }
            ));
        }
        WizardStep::Details => {
            out.push_str(&format!(
                "  anonymous: {}\n",
                if draft.is_anonymous { "yes" } else { "no" }
            ));
            for field in donor::visible_fields(draft.is_anonymous) {
                let value = match field {
                    DonorField::Name => &draft.donor_name,
                    DonorField::Email => &draft.donor_email,
                    DonorField::Phone => &draft.donor_phone,
                    DonorField::Message => &draft.message,
                };
                let required = if field.required(draft.is_anonymous) {
                    " *"
                } else {
                    ""
                };
                out.push_str(&format!("  {}{required}: {value}\n", field.label()));
            }
        }
        WizardStep::Payment => {
            for (idx, method) in PaymentMethod::ALL.iter().enumerate() {
                let marker = if draft.payment_method == Some(*method) {
                    '*'
                } else {
                    ' '
                };
                out.push_str(&format!(
                    " {marker}[{}] {:<18} ({})\n",
                    idx + 1,
                    method.label(),
                    method.icon()
                ));
            }
            out.push_str(&format!(
                "  total: {}{}\n",
                config.format_amount(draft.amount),
                if draft.is_recurring { " / month" } else { "" }
            ));
        }
    }
    if let Some(err) = controller.last_error() {
        out.push_str(&format!("  ! {err}\n"));
    }
    if let Some(err) = controller.commit_error() {
        out.push_str(&format!("  ! donation could not be completed: {err}\n"));
    }
    out
}

fn help_text(step: WizardStep) -> String {
    let specific: &[&str] = match step {
        WizardStep::Amount => &[
            "  <n>              select preset n",
            "  amount <digits>  enter a custom amount (empty to clear)",
            "  recurring        toggle monthly giving",
            "  next             continue to details",
        ],
        WizardStep::Details => &[
            "  anonymous        toggle anonymous giving",
            "  name <text>      set your name",
            "  email <text>     set your email",
            "  phone <text>     set your phone (optional)",
            "  message <text>   leave a message (optional)",
            "  next             continue to payment",
            "  back             return to amount",
            "  step <n>         jump back to step n",
        ],
        WizardStep::Payment => &[
            "  pay <method|n>   choose card, upi, netbanking, or wallet",
            "  submit           complete the donation",
            "  back             return to details",
            "  step <n>         jump back to step n",
        ],
    };
    let common = [
        "  show             redraw this step",
        "  cancel           start over",
        "  quit             leave without donating",
    ];
    specific
        .iter()
        .chain(common.iter())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{CommitError, CommitReceipt, CommitRequest, SimulatedGateway};
    use crate::config::default_config;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;
    use std::time::Duration;

    type Calls = Rc<RefCell<Vec<(String, u64)>>>;

    fn controller(config: &DonateConfig) -> (WizardController, Calls) {
        let calls: Calls = Rc::default();
        let sink = Rc::clone(&calls);
        let controller = WizardController::new(
            config.tiers.clone(),
            Box::new(move |name: &str, amount: u64| {
                sink.borrow_mut().push((name.to_string(), amount))
            }),
        );
        (controller, calls)
    }

    fn run_script(script: &str, gateway: &mut dyn CommitGateway) -> (String, Calls, bool) {
        let config = default_config();
        let (controller, calls) = controller(&config);
        let mut output = Vec::new();
        let donated = {
            let mut session = Session::new(
                controller,
                &config,
                gateway,
                Cursor::new(script.as_bytes()),
                &mut output,
            );
            matches!(
                session.run().expect("session"),
                SessionOutcome::Donated(_)
            )
        };
        (String::from_utf8(output).expect("utf8"), calls, donated)
    }

    #[test]
    fn preset_named_upi_donation() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let script = "2\nnext\nname Asha\nemail a@x.com\nnext\npay upi\nsubmit\n";
        let (output, calls, donated) = run_script(script, &mut gateway);
        assert!(donated);
        assert_eq!(*calls.borrow(), vec![("Asha".to_string(), 1000)]);
        assert!(output.contains("Step 3 of 3"));
        assert_eq!(gateway.committed()[0].payment_method, PaymentMethod::Upi);
    }

    #[test]
    fn anonymous_custom_amount_with_default_card() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let script = "amount 7,500\nnext\nanonymous\nnext\nsubmit\n";
        let (output, calls, donated) = run_script(script, &mut gateway);
        assert!(donated);
        assert!(output.contains("ignored 1 non-digit character(s)"));
        assert_eq!(*calls.borrow(), vec![("Anonymous".to_string(), 7500)]);
        assert_eq!(gateway.committed()[0].payment_method, PaymentMethod::Card);
    }

    #[test]
    fn zero_amount_stays_on_step_one() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let (output, calls, donated) = run_script("next\n", &mut gateway);
        assert!(!donated);
        assert!(output.contains("error: Please select or enter a donation amount"));
        assert!(!output.contains("Step 2 of 3"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn back_redraws_previous_step_with_values() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let script = "amount 250\nnext\nname Ravi\nback\nquit\n";
        let (output, _, donated) = run_script(script, &mut gateway);
        assert!(!donated);
        let last_step_one = output.rfind("Step 1 of 3").expect("redrawn step 1");
        assert!(output[last_step_one..].contains("custom amount: 250"));
    }

    #[test]
    fn unknown_commands_are_reported() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let (output, _, _) = run_script("dance\n9\n", &mut gateway);
        assert!(output.contains("unknown command \"dance\""));
        assert!(output.contains("error: no preset tier 9"));
    }

    #[test]
    fn step_error_is_not_shown_after_going_back() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let (output, _, _) = run_script("1\nnext\nnext\nback\nquit\n", &mut gateway);
        assert!(output.contains("error: Please enter your name"));
        let last_step_one = output.rfind("Step 1 of 3").expect("redrawn step 1");
        assert!(!output[last_step_one..].contains("Please enter your name"));
    }

    #[test]
    fn step_command_jumps_back_only() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let script = "3\nnext\nanonymous\nnext\nstep 1\nstep 3\nstep x\nquit\n";
        let (output, _, _) = run_script(script, &mut gateway);
        let last_step_one = output.rfind("Step 1 of 3").expect("jumped to step 1");
        assert!(output.rfind("Step 3 of 3").expect("reached step 3") < last_step_one);
        assert!(output[last_step_one..].contains("error: cannot jump ahead from step 1"));
        assert!(output.contains("usage: step <1|2|3>"));
    }

    #[test]
    fn payment_step_lists_methods_with_icons() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let script = "1\nnext\nanonymous\nnext\npay 4\nquit\n";
        let (output, _, _) = run_script(script, &mut gateway);
        assert!(output.contains("(credit-card)"));
        assert!(output.contains("*[4] Digital Wallet"));
    }

    #[test]
    fn empty_amount_clears_selection() {
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let (output, _, _) = run_script("2\namount\nnext\nquit\n", &mut gateway);
        assert!(output.contains("error: Please select or enter a donation amount"));
        assert!(!output.contains("Step 2 of 3"));
    }

    /// Writer that closes once the first prompt has been shown.
    #[derive(Default)]
    struct ClosesAfterPrompt {
        prompted: bool,
    }

    impl Write for ClosesAfterPrompt {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.prompted {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.prompted = buf == b"> ";
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_errors_end_the_session() {
        let config = default_config();
        let (controller, _) = controller(&config);
        let mut gateway = SimulatedGateway::new(Duration::ZERO);
        let mut session = Session::new(
            controller,
            &config,
            &mut gateway,
            Cursor::new("help\n".as_bytes()),
            ClosesAfterPrompt::default(),
        );
        assert!(session.run().is_err());
    }

    struct FailingGateway;

    impl CommitGateway for FailingGateway {
        fn commit(&mut self, _request: &CommitRequest) -> Result<CommitReceipt, CommitError> {
            Err(CommitError::Transport("offline".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn commit_failure_keeps_session_on_payment_step() {
        let mut gateway = FailingGateway;
        let script = "1\nnext\nanonymous\nnext\nsubmit\nshow\n";
        let (output, calls, donated) = run_script(script, &mut gateway);
        assert!(!donated);
        assert!(output
            .contains("error: donation could not be completed: could not reach backend: offline"));
        assert!(calls.borrow().is_empty());
    }
}
