use std::time::Duration;

use crate::JobStatus;

/// Delay between polls of a job that is still queued or running.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1500);
/// Delay before re-polling after a transport or parse failure. Retries are unbounded.
pub const RETRY_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Polling,
    Retrying,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    PollAfter(Duration),
    Terminate,
}

/// Per-job polling state machine.
///
/// At most one status request is outstanding at a time: a new request may only
/// begin after the previous one has been observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poller {
    state: PollerState,
    awaiting_response: bool,
    consecutive_failures: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new()
    }
}

impl Poller {
    pub fn new() -> Self {
        Self {
            state: PollerState::Polling,
            awaiting_response: false,
            consecutive_failures: 0,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Marks a status request as issued. Returns `false` when one is already
    /// outstanding or the poller has terminated.
    pub fn begin_request(&mut self) -> bool {
        if self.state == PollerState::Terminated || self.awaiting_response {
            return false;
        }
        self.state = PollerState::Polling;
        self.awaiting_response = true;
        true
    }

    /// Applies a successfully decoded status. `None` means no request was outstanding.
    pub fn on_status(&mut self, status: &JobStatus) -> Option<PollDecision> {
        if !self.awaiting_response {
            return None;
        }
        self.awaiting_response = false;
        self.consecutive_failures = 0;
        if status.is_terminal() {
            self.state = PollerState::Terminated;
            Some(PollDecision::Terminate)
        } else {
            Some(PollDecision::PollAfter(POLL_INTERVAL))
        }
    }

    /// Applies a transport or parse failure of the outstanding request.
    pub fn on_transient_failure(&mut self) -> Option<PollDecision> {
        if !self.awaiting_response {
            return None;
        }
        self.awaiting_response = false;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.state = PollerState::Retrying;
        Some(PollDecision::PollAfter(RETRY_DELAY))
    }
}
