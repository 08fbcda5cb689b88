//! Commit boundary: hands a validated draft to the payment backend.
//!
//! The wizard only knows the `CommitGateway` trait. A simulated gateway keeps
//! the fixed-delay always-succeeds behavior; the HTTP gateway posts to the
//! platform REST API. Neither retries: a failed commit returns control to
//! step 3 with the draft intact.
mod http;
mod simulated;

pub use http::HttpGateway;
pub use simulated::SimulatedGateway;

use crate::wizard::{amount, donor, payment, DonationDraft, PaymentMethod, ValidationError};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use thiserror::Error;

/// Request body sent to the backend on commit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub amount: NonZeroU64,
    pub is_recurring: bool,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub payment_method: PaymentMethod,
}

impl CommitRequest {
    /// Build a request from a draft, re-running every step gate.
    ///
    /// Identity fields are dropped for anonymous donations even if the donor
    /// typed them before ticking the box.
    pub fn from_draft(draft: &DonationDraft) -> Result<Self, ValidationError> {
        let amount = amount::validate(draft)?;
        donor::validate(draft)?;
        let payment_method = payment::validate(draft)?;
        let amount = NonZeroU64::new(amount).ok_or(ValidationError::AmountNotPositive)?;
        let identity = |value: &str| {
            if draft.is_anonymous {
                None
            } else {
                non_blank(value)
            }
        };
        Ok(Self {
            amount,
            is_recurring: draft.is_recurring,
            is_anonymous: draft.is_anonymous,
            donor_name: identity(&draft.donor_name),
            donor_email: identity(&draft.donor_email),
            donor_phone: non_blank(&draft.donor_phone),
            message: non_blank(&draft.message),
            payment_method,
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Backend acknowledgement of a committed donation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CommitReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("backend rejected donation (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("could not reach backend: {0}")]
    Transport(String),
    #[error("unexpected backend response: {0}")]
    InvalidResponse(String),
}

/// Anything that can take a committed donation.
pub trait CommitGateway {
    fn commit(&mut self, request: &CommitRequest) -> Result<CommitReceipt, CommitError>;

    fn name(&self) -> &'static str;
}
