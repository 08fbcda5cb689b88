//! Step 1: preset tiers, custom amount entry, and the recurring toggle.
use super::error::ValidationError;
use super::types::{AmountTier, DonationDraft};

/// Field-level input state for step 1 that is not part of the draft itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountInput {
    custom_text: String,
    selected_tier: Option<usize>,
}

impl AmountInput {
    pub fn custom_text(&self) -> &str {
        &self.custom_text
    }

    /// Index into the tier list of the highlighted preset.
    pub fn selected_tier(&self) -> Option<usize> {
        self.selected_tier
    }
}

/// Editing handle for step 1, bound to the controller's draft.
#[derive(Debug)]
pub struct AmountSelector<'a> {
    tiers: &'a [AmountTier],
    input: &'a mut AmountInput,
    draft: &'a mut DonationDraft,
}

impl<'a> AmountSelector<'a> {
    pub(super) fn new(
        tiers: &'a [AmountTier],
        input: &'a mut AmountInput,
        draft: &'a mut DonationDraft,
    ) -> Self {
        Self {
            tiers,
            input,
            draft,
        }
    }

    pub fn tiers(&self) -> &[AmountTier] {
        self.tiers
    }

    /// Select the preset whose amount is `amount`; clears any custom text.
    pub fn select_preset(&mut self, amount: u64) -> Option<&AmountTier> {
        let index = self.tiers.iter().position(|tier| tier.amount == amount)?;
        self.select_index(index)
    }

    /// Select the preset at `index` in the tier list.
    pub fn select_index(&mut self, index: usize) -> Option<&AmountTier> {
        let tier = self.tiers.get(index)?;
        self.input.selected_tier = Some(index);
        self.input.custom_text.clear();
        self.draft.amount = tier.amount;
        tracing::debug!(amount = tier.amount, "preset selected");
        Some(tier)
    }

    /// Type `text` into the custom field, one character at a time.
    ///
    /// Returns the number of characters rejected.
    pub fn type_custom(&mut self, text: &str) -> usize {
        let mut rejected = 0;
        for ch in text.chars() {
            if !self.push_digit(ch) {
                rejected += 1;
            }
        }
        rejected
    }

    /// Append one character to the custom field.
    ///
    /// Only ASCII digits are accepted, and only while the value still fits in
    /// a `u64`.
    pub fn push_digit(&mut self, ch: char) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        self.input.custom_text.push(ch);
        if self.input.custom_text.parse::<u64>().is_err() {
            self.input.custom_text.pop();
            return false;
        }
        self.sync_custom();
        true
    }

    pub fn backspace(&mut self) {
        self.input.custom_text.pop();
        self.sync_custom();
    }

    /// Replace the custom field contents, filtering as if typed.
    pub fn set_custom(&mut self, text: &str) -> usize {
        self.input.custom_text.clear();
        self.sync_custom();
        self.type_custom(text)
    }

    /// Empty the custom field. Like any custom edit this deselects the preset,
    /// leaving no amount chosen.
    pub fn clear_custom(&mut self) {
        self.set_custom("");
    }

    pub fn toggle_recurring(&mut self) -> bool {
        self.draft.is_recurring = !self.draft.is_recurring;
        self.draft.is_recurring
    }

    pub fn set_recurring(&mut self, recurring: bool) {
        self.draft.is_recurring = recurring;
    }

    pub fn amount(&self) -> u64 {
        self.draft.amount
    }

    pub fn validate(&self) -> Result<u64, ValidationError> {
        validate(self.draft)
    }

    fn sync_custom(&mut self) {
        self.input.selected_tier = None;
        self.draft.amount = if self.input.custom_text.is_empty() {
            0
        } else {
            self.input.custom_text.parse().unwrap_or(0)
        };
    }
}

/// Exit gate for step 1.
pub fn validate(draft: &DonationDraft) -> Result<u64, ValidationError> {
    if draft.amount == 0 {
        return Err(ValidationError::AmountNotPositive);
    }
    Ok(draft.amount)
}
