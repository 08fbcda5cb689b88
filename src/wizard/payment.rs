//! Step 3: payment channel selection.
//!
//! No per-channel configuration is collected here; the payment handoff itself
//! belongs to the commit gateway.
use super::error::ValidationError;
use super::types::{DonationDraft, PaymentMethod};

#[derive(Debug)]
pub struct PaymentMethodSelector<'a> {
    draft: &'a mut DonationDraft,
}

impl<'a> PaymentMethodSelector<'a> {
    pub(super) fn new(draft: &'a mut DonationDraft) -> Self {
        Self { draft }
    }

    pub fn options(&self) -> &'static [PaymentMethod] {
        &PaymentMethod::ALL
    }

    pub fn select(&mut self, method: PaymentMethod) {
        tracing::debug!(method = %method, "payment method selected");
        self.draft.payment_method = Some(method);
    }

    /// Clear the selection. The wizard starts with `card` selected, so this
    /// is the only way to reach the missing-method gate.
    pub fn clear(&mut self) {
        self.draft.payment_method = None;
    }

    pub fn selected(&self) -> Option<PaymentMethod> {
        self.draft.payment_method
    }

    pub fn validate(&self) -> Result<PaymentMethod, ValidationError> {
        validate(self.draft)
    }
}

/// Exit gate for step 3.
pub fn validate(draft: &DonationDraft) -> Result<PaymentMethod, ValidationError> {
    draft
        .payment_method
        .ok_or(ValidationError::MissingPaymentMethod)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_passes_gate() {
        let mut draft = DonationDraft::new();
        let selector = PaymentMethodSelector::new(&mut draft);
        assert_eq!(selector.validate(), Ok(PaymentMethod::Card));
    }

    #[test]
    fn cleared_selection_fails_gate() {
        let mut draft = DonationDraft::new();
        let mut selector = PaymentMethodSelector::new(&mut draft);
        selector.clear();
        assert_eq!(
            selector.validate(),
            Err(ValidationError::MissingPaymentMethod)
        );
        selector.select(PaymentMethod::Wallet);
        assert_eq!(selector.selected(), Some(PaymentMethod::Wallet));
    }
}
