//! Error taxonomy for the donation wizard.
use super::types::{WizardPhase, WizardStep};
use crate::commit::CommitError;
use thiserror::Error;

/// Step-gate failures. Shown inline and cleared once the step advances.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select or enter a donation amount greater than zero")]
    AmountNotPositive,
    #[error("Please enter your name or choose to donate anonymously")]
    MissingDonorName,
    #[error("Please enter your email or choose to donate anonymously")]
    MissingDonorEmail,
    #[error("Please select a payment method")]
    MissingPaymentMethod,
}

impl ValidationError {
    /// The step whose gate produces this error.
    pub fn step(&self) -> WizardStep {
        match self {
            ValidationError::AmountNotPositive => WizardStep::Amount,
            ValidationError::MissingDonorName | ValidationError::MissingDonorEmail => {
                WizardStep::Details
            }
            ValidationError::MissingPaymentMethod => WizardStep::Payment,
        }
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a donation is being processed; please wait")]
    Busy,
    #[error("cannot {action} from {from}")]
    InvalidTransition {
        from: WizardPhase,
        action: &'static str,
    },
    #[error("no preset tier {0}")]
    UnknownTier(u64),
    #[error("unknown payment method {0:?}; choose card, upi, netbanking, or wallet")]
    UnknownPaymentMethod(String),
    #[error("donation could not be completed: {0}")]
    Commit(#[from] CommitError),
}
