//! Step cursor, gates, and the terminal commit for one wizard session.
use super::amount::{self, AmountInput, AmountSelector};
use super::donor::{self, DonorDetailsCollector};
use super::error::{ValidationError, WizardError};
use super::payment::{self, PaymentMethodSelector};
use super::types::{AmountTier, DonationDraft, PaymentMethod, WizardPhase, WizardStep};
use crate::commit::{CommitError, CommitGateway, CommitReceipt, CommitRequest};
use serde::Serialize;
use std::fmt;

/// Called once per successful commit with the display name and amount.
pub type SuccessCallback = Box<dyn FnMut(&str, u64)>;

/// Summary of a completed donation, returned after the success callback runs.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DonationReceipt {
    pub display_name: String,
    pub amount: u64,
    pub is_recurring: bool,
    pub payment_method: PaymentMethod,
    pub commit: CommitReceipt,
}

/// Owns the draft and the step cursor for a single donation.
///
/// Collectors are handed out as short-lived borrows of the draft, so no other
/// component holds cross-step state.
pub struct WizardController {
    tiers: Vec<AmountTier>,
    draft: DonationDraft,
    amount_input: AmountInput,
    phase: WizardPhase,
    validation_error: Option<ValidationError>,
    commit_error: Option<CommitError>,
    on_success: SuccessCallback,
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("tiers", &self.tiers)
            .field("draft", &self.draft)
            .field("amount_input", &self.amount_input)
            .field("phase", &self.phase)
            .field("validation_error", &self.validation_error)
            .field("commit_error", &self.commit_error)
            .finish_non_exhaustive()
    }
}

impl WizardController {
    pub fn new(tiers: Vec<AmountTier>, on_success: SuccessCallback) -> Self {
        Self {
            tiers,
            draft: DonationDraft::new(),
            amount_input: AmountInput::default(),
            phase: WizardPhase::Step(WizardStep::Amount),
            validation_error: None,
            commit_error: None,
            on_success,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// The visible step. Processing and done both sit on the payment step.
    pub fn current_step(&self) -> WizardStep {
        match self.phase {
            WizardPhase::Step(step) => step,
            WizardPhase::Processing | WizardPhase::Done => WizardStep::Payment,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.phase == WizardPhase::Processing
    }

    /// Whether the back control is usable right now.
    pub fn can_go_back(&self) -> bool {
        matches!(self.phase, WizardPhase::Step(step) if step.prev().is_some())
    }

    pub fn tiers(&self) -> &[AmountTier] {
        &self.tiers
    }

    pub fn draft(&self) -> &DonationDraft {
        &self.draft
    }

    pub fn amount_input(&self) -> &AmountInput {
        &self.amount_input
    }

    /// The gate error to show on the current step, if it still applies.
    ///
    /// A recorded error disappears as soon as the offending fields are fixed,
    /// without waiting for the next advance attempt.
    pub fn last_error(&self) -> Option<ValidationError> {
        let recorded = self
            .validation_error
            .as_ref()
            .filter(|err| err.step() == self.current_step())?;
        self.gate(recorded.step()).err()
    }

    /// The error from the most recent failed commit, while still on step 3.
    pub fn commit_error(&self) -> Option<&CommitError> {
        self.commit_error
            .as_ref()
            .filter(|_| self.phase == WizardPhase::Step(WizardStep::Payment))
    }

    pub fn amount_mut(&mut self) -> Result<AmountSelector<'_>, WizardError> {
        self.require_step(WizardStep::Amount, "edit the amount")?;
        Ok(AmountSelector::new(
            &self.tiers,
            &mut self.amount_input,
            &mut self.draft,
        ))
    }

    pub fn donor_mut(&mut self) -> Result<DonorDetailsCollector<'_>, WizardError> {
        self.require_step(WizardStep::Details, "edit donor details")?;
        Ok(DonorDetailsCollector::new(&mut self.draft))
    }

    pub fn payment_mut(&mut self) -> Result<PaymentMethodSelector<'_>, WizardError> {
        self.require_step(WizardStep::Payment, "change the payment method")?;
        Ok(PaymentMethodSelector::new(&mut self.draft))
    }

    /// Run the current step's gate and advance on success.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editable_step("advance")?;
        let Some(next) = step.next() else {
            return Err(WizardError::InvalidTransition {
                from: self.phase,
                action: "advance (submit instead)",
            });
        };
        if let Err(err) = self.gate(step) {
            tracing::warn!(step = step.number(), error = %err, "step gate rejected");
            self.validation_error = Some(err.clone());
            return Err(err.into());
        }
        self.validation_error = None;
        self.move_to(next);
        Ok(next)
    }

    /// Go back one step. Entered data is kept.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editable_step("go back")?;
        let prev = step.prev().ok_or(WizardError::InvalidTransition {
            from: self.phase,
            action: "go back",
        })?;
        self.move_to(prev);
        Ok(prev)
    }

    /// Jump back to any earlier step (or stay on the current one).
    pub fn go_to(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        let step = self.editable_step("change step")?;
        if target > step {
            return Err(WizardError::InvalidTransition {
                from: self.phase,
                action: "jump ahead",
            });
        }
        self.move_to(target);
        Ok(target)
    }

    /// Enter `Processing` and return the request to commit.
    ///
    /// Until `finish_submit` is called every navigation, edit, and resubmit is
    /// refused with `WizardError::Busy`.
    pub fn begin_submit(&mut self) -> Result<CommitRequest, WizardError> {
        let step = self.editable_step("submit")?;
        if step != WizardStep::Payment {
            return Err(WizardError::InvalidTransition {
                from: self.phase,
                action: "submit",
            });
        }
        let request = match payment::validate(&self.draft)
            .and_then(|_| CommitRequest::from_draft(&self.draft))
        {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "submit rejected");
                self.validation_error = Some(err.clone());
                return Err(err.into());
            }
        };
        self.validation_error = None;
        self.commit_error = None;
        self.phase = WizardPhase::Processing;
        tracing::info!(
            amount = request.amount.get(),
            method = %request.payment_method,
            recurring = request.is_recurring,
            "donation commit started"
        );
        Ok(request)
    }

    /// Resolve a pending commit.
    ///
    /// Success moves to `Done`, fires the callback, and discards the draft.
    /// Failure returns to step 3 with the draft untouched.
    pub fn finish_submit(
        &mut self,
        outcome: Result<CommitReceipt, CommitError>,
    ) -> Result<DonationReceipt, WizardError> {
        if self.phase != WizardPhase::Processing {
            return Err(WizardError::InvalidTransition {
                from: self.phase,
                action: "finish a commit",
            });
        }
        match outcome {
            Ok(commit) => {
                let receipt = DonationReceipt {
                    display_name: self.draft.display_name(),
                    amount: self.draft.amount,
                    is_recurring: self.draft.is_recurring,
                    payment_method: self.draft.payment_method.unwrap_or_default(),
                    commit,
                };
                self.phase = WizardPhase::Done;
                tracing::info!(
                    amount = receipt.amount,
                    donation_id = receipt.commit.donation_id.as_deref().unwrap_or("-"),
                    "donation committed"
                );
                (self.on_success)(&receipt.display_name, receipt.amount);
                self.reset_draft();
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "donation commit failed");
                self.phase = WizardPhase::Step(WizardStep::Payment);
                self.commit_error = Some(err.clone());
                Err(err.into())
            }
        }
    }

    /// Submit from step 3 and wait for the gateway.
    pub fn submit(
        &mut self,
        gateway: &mut dyn CommitGateway,
    ) -> Result<DonationReceipt, WizardError> {
        let request = self.begin_submit()?;
        tracing::debug!(gateway = gateway.name(), "handing off to gateway");
        let outcome = gateway.commit(&request);
        self.finish_submit(outcome)
    }

    /// Discard the draft and return to step 1.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        if self.is_processing() {
            return Err(WizardError::Busy);
        }
        self.reset_draft();
        self.phase = WizardPhase::Step(WizardStep::Amount);
        tracing::debug!("wizard reset");
        Ok(())
    }

    fn gate(&self, step: WizardStep) -> Result<(), ValidationError> {
        match step {
            WizardStep::Amount => amount::validate(&self.draft).map(|_| ()),
            WizardStep::Details => donor::validate(&self.draft),
            WizardStep::Payment => payment::validate(&self.draft).map(|_| ()),
        }
    }

    fn editable_step(&self, action: &'static str) -> Result<WizardStep, WizardError> {
        match self.phase {
            WizardPhase::Step(step) => Ok(step),
            WizardPhase::Processing => Err(WizardError::Busy),
            WizardPhase::Done => Err(WizardError::InvalidTransition {
                from: self.phase,
                action,
            }),
        }
    }

    fn require_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.editable_step(action)? != expected {
            return Err(WizardError::InvalidTransition {
                from: self.phase,
                action,
            });
        }
        Ok(())
    }

    /// Errors belong to the step they were raised on and are dropped on leaving it.
    fn move_to(&mut self, step: WizardStep) {
        if self.current_step() != step {
            self.validation_error = None;
            self.commit_error = None;
        }
        tracing::debug!(from = %self.phase, to = %step, "step changed");
        self.phase = WizardPhase::Step(step);
    }

    fn reset_draft(&mut self) {
        self.draft = DonationDraft::new();
        self.amount_input = AmountInput::default();
        self.validation_error = None;
        self.commit_error = None;
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
