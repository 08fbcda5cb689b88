//! Donation wizard: amount, donor details, and payment method collected in
//! three gated steps, then committed once through a pluggable gateway.
pub mod cli;
pub mod commit;
pub mod config;
pub mod session;
pub mod wizard;
pub mod workflow;
