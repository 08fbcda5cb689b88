use super::{CommitError, CommitGateway, CommitReceipt, CommitRequest};
use std::thread;
use std::time::Duration;

/// Waits a fixed delay and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
    committed: Vec<CommitRequest>,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            committed: Vec::new(),
        }
    }

    /// Requests accepted so far, oldest first.
    pub fn committed(&self) -> &[CommitRequest] {
        &self.committed
    }
}

impl CommitGateway for SimulatedGateway {
    fn commit(&mut self, request: &CommitRequest) -> Result<CommitReceipt, CommitError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.committed.push(request.clone());
        Ok(CommitReceipt {
            donation_id: Some(format!("sim-{}", self.committed.len())),
            status: Some("completed".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
