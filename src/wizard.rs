//! Donation wizard: three data-entry steps gated by validation, then a single
//! commit through a `CommitGateway`.
//!
//! Nothing here performs I/O. The session layer drives the controller from a
//! terminal and the commit module supplies the gateway.
pub mod amount;
mod controller;
pub mod donor;
mod error;
pub mod payment;
mod types;

pub use amount::{AmountInput, AmountSelector};
pub use controller::{DonationReceipt, SuccessCallback, WizardController};
pub use donor::{DonorDetailsCollector, DonorField};
pub use error::{ValidationError, WizardError};
pub use payment::PaymentMethodSelector;
pub use types::{
    default_tiers, AmountTier, DonationDraft, PaymentMethod, WizardPhase, WizardStep,
    ANONYMOUS_DISPLAY_NAME,
};
