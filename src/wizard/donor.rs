//! Step 2: donor identity and optional message.
//!
//! The anonymous flag gates the name and email fields. Phone and message are
//! always shown and never required. Email is accepted as typed.
use super::error::ValidationError;
use super::types::DonationDraft;

/// Fields rendered on step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonorField {
    Name,
    Email,
    Phone,
    Message,
}

impl DonorField {
    pub fn label(&self) -> &'static str {
        match self {
            DonorField::Name => "Full name",
            DonorField::Email => "Email",
            DonorField::Phone => "Phone (optional)",
            DonorField::Message => "Message (optional)",
        }
    }

    pub fn required(&self, is_anonymous: bool) -> bool {
        match self {
            DonorField::Name | DonorField::Email => !is_anonymous,
            DonorField::Phone | DonorField::Message => false,
        }
    }
}

/// Editing handle for step 2, bound to the controller's draft.
#[derive(Debug)]
pub struct DonorDetailsCollector<'a> {
    draft: &'a mut DonationDraft,
}

impl<'a> DonorDetailsCollector<'a> {
    pub(super) fn new(draft: &'a mut DonationDraft) -> Self {
        Self { draft }
    }

    /// Toggle anonymity. Hidden name/email values are kept, not cleared.
    pub fn set_anonymous(&mut self, anonymous: bool) {
        self.draft.is_anonymous = anonymous;
    }

    pub fn toggle_anonymous(&mut self) -> bool {
        self.draft.is_anonymous = !self.draft.is_anonymous;
        self.draft.is_anonymous
    }

    pub fn set_name(&mut self, name: &str) {
        self.draft.donor_name = name.to_string();
    }

    pub fn set_email(&mut self, email: &str) {
        self.draft.donor_email = email.to_string();
    }

    pub fn set_phone(&mut self, phone: &str) {
        self.draft.donor_phone = phone.to_string();
    }

    pub fn set_message(&mut self, message: &str) {
        self.draft.message = message.to_string();
    }

    pub fn set_field(&mut self, field: DonorField, value: &str) {
        match field {
            DonorField::Name => self.set_name(value),
            DonorField::Email => self.set_email(value),
            DonorField::Phone => self.set_phone(value),
            DonorField::Message => self.set_message(value),
        }
    }

    pub fn visible_fields(&self) -> Vec<DonorField> {
        visible_fields(self.draft.is_anonymous)
    }

    pub fn display_name(&self) -> String {
        self.draft.display_name()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(self.draft)
    }
}

pub fn visible_fields(is_anonymous: bool) -> Vec<DonorField> {
    let mut fields = Vec::with_capacity(4);
    if !is_anonymous {
        fields.push(DonorField::Name);
        fields.push(DonorField::Email);
    }
    fields.push(DonorField::Phone);
    fields.push(DonorField::Message);
    fields
}

/// Exit gate for step 2. Whitespace-only values count as empty.
pub fn validate(draft: &DonationDraft) -> Result<(), ValidationError> {
    if draft.is_anonymous {
        return Ok(());
    }
    if draft.donor_name.trim().is_empty() {
        return Err(ValidationError::MissingDonorName);
    }
    if draft.donor_email.trim().is_empty() {
        return Err(ValidationError::MissingDonorEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_skips_identity_requirements() {
        let mut draft = DonationDraft::new();
        let mut collector = DonorDetailsCollector::new(&mut draft);
        collector.set_anonymous(true);
        assert_eq!(collector.validate(), Ok(()));
        assert_eq!(
            collector.visible_fields(),
            vec![DonorField::Phone, DonorField::Message]
        );
    }

    #[test]
    fn named_donor_requires_name_then_email() {
        let mut draft = DonationDraft::new();
        assert_eq!(validate(&draft), Err(ValidationError::MissingDonorName));
        draft.donor_name = "Asha".to_string();
        assert_eq!(validate(&draft), Err(ValidationError::MissingDonorEmail));
        draft.donor_email = "not-an-email".to_string();
        assert_eq!(validate(&draft), Ok(()));
    }

    #[test]
    fn blank_name_counts_as_missing() {
        let mut draft = DonationDraft::new();
        draft.donor_name = "   ".to_string();
        draft.donor_email = "a@x.com".to_string();
        assert_eq!(validate(&draft), Err(ValidationError::MissingDonorName));
    }

    #[test]
    fn toggling_anonymous_keeps_typed_values() {
        let mut draft = DonationDraft::new();
        {
            let mut collector = DonorDetailsCollector::new(&mut draft);
            collector.set_field(DonorField::Name, "Asha");
            collector.toggle_anonymous();
            assert_eq!(collector.display_name(), "Anonymous");
            collector.toggle_anonymous();
        }
        assert_eq!(draft.donor_name, "Asha");
        assert!(!draft.is_anonymous);
    }

    #[test]
    fn optional_fields_are_never_required() {
        assert!(!DonorField::Phone.required(false));
        assert!(!DonorField::Message.required(false));
        assert!(DonorField::Name.required(false));
        assert!(!DonorField::Email.required(true));
    }
}
