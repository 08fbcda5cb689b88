//! Shared types for the donation wizard.
//!
//! Lookup tables are closed enums matched at compile time, so an unknown
//! payment channel can never reach the UI as a silent miss.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name reported for anonymous donations.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// Payment channels offered at step 3.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
    Netbanking,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Card,
        PaymentMethod::Upi,
        PaymentMethod::Netbanking,
        PaymentMethod::Wallet,
    ];

    /// Return the stable string identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Netbanking => "netbanking",
            PaymentMethod::Wallet => "wallet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Netbanking => "Net Banking",
            PaymentMethod::Wallet => "Digital Wallet",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "credit-card",
            PaymentMethod::Upi => "smartphone",
            PaymentMethod::Netbanking => "landmark",
            PaymentMethod::Wallet => "wallet",
        }
    }

    /// Parse a wire identifier (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three data-entry steps, numbered as the user sees them.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Amount,
    Details,
    Payment,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Amount => 1,
            WizardStep::Details => 2,
            WizardStep::Payment => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::Amount),
            2 => Some(WizardStep::Details),
            3 => Some(WizardStep::Payment),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Amount => "Choose amount",
            WizardStep::Details => "Your details",
            WizardStep::Payment => "Payment method",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.number())
    }
}

/// Where the wizard is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Step(WizardStep),
    Processing,
    Done,
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardPhase::Step(step) => fmt::Display::fmt(step, f),
            WizardPhase::Processing => f.write_str("processing"),
            WizardPhase::Done => f.write_str("done"),
        }
    }
}

/// A preset donation amount with its impact blurb.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AmountTier {
    pub amount: u64,
    pub impact: String,
}

impl AmountTier {
    pub fn new(amount: u64, impact: &str) -> Self {
        Self {
            amount,
            impact: impact.to_string(),
        }
    }
}

pub fn default_tiers() -> Vec<AmountTier> {
    vec![
        AmountTier::new(500, "Provides school supplies for one child"),
        AmountTier::new(1000, "Funds a legal-aid consultation for a family"),
        AmountTier::new(5000, "Supports a community health camp for a day"),
        AmountTier::new(10000, "Sponsors a month of shelter for a family"),
    ]
}

/// In-progress donation data held by the wizard.
///
/// `amount == 0` means no amount has been chosen yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DonationDraft {
    pub amount: u64,
    pub is_recurring: bool,
    pub is_anonymous: bool,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub message: String,
    pub payment_method: Option<PaymentMethod>,
}

impl DonationDraft {
    pub fn new() -> Self {
        Self {
            payment_method: Some(PaymentMethod::default()),
            ..Default::default()
        }
    }

    /// Name reported to the success callback.
    pub fn display_name(&self) -> String {
        if self.is_anonymous {
            ANONYMOUS_DISPLAY_NAME.to_string()
        } else {
            self.donor_name.trim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_parse_is_case_insensitive() {
        assert_eq!(PaymentMethod::parse("UPI"), Some(PaymentMethod::Upi));
        assert_eq!(
            PaymentMethod::parse(" netbanking "),
            Some(PaymentMethod::Netbanking)
        );
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn payment_method_serializes_snake_case() {
        let json = serde_json::to_string(&PaymentMethod::Netbanking).expect("serialize");
        assert_eq!(json, "\"netbanking\"");
    }

    #[test]
    fn steps_walk_forward_and_back() {
        assert_eq!(WizardStep::Amount.next(), Some(WizardStep::Details));
        assert_eq!(WizardStep::Payment.next(), None);
        assert_eq!(WizardStep::Details.prev(), Some(WizardStep::Amount));
        assert_eq!(WizardStep::Amount.prev(), None);
        assert_eq!(WizardStep::from_number(4), None);
    }

    #[test]
    fn new_draft_defaults_to_card() {
        let draft = DonationDraft::new();
        assert_eq!(draft.amount, 0);
        assert!(!draft.is_recurring);
        assert!(!draft.is_anonymous);
        assert_eq!(draft.payment_method, Some(PaymentMethod::Card));
    }

    #[test]
    fn display_name_masks_anonymous_donors() {
        let mut draft = DonationDraft::new();
        draft.donor_name = "Asha".to_string();
        assert_eq!(draft.display_name(), "Asha");
        draft.is_anonymous = true;
        assert_eq!(draft.display_name(), ANONYMOUS_DISPLAY_NAME);
    }
}
