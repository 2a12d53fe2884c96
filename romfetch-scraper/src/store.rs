//! Ticket → result map with single consumption.
//!
//! A submitted ticket is marked pending until its job deposits a result.
//! Reading a ready result removes it; pending entries stay put. Results
//! that are never read stay until process exit.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::dispatch::Ticket;

/// Broad class of a failed job, for hosts that want more than an empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreadable,
    Unrecognized,
    UnsupportedFormat,
    Provider,
    NoProfile,
    Serialization,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Found { records: usize },
    NotFound,
    Failed { kind: FailureKind, message: String },
}

/// What a finished job leaves behind for its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    /// Serialized document; empty for no match and for every failure.
    pub payload: String,
    pub outcome: JobOutcome,
}

impl Completed {
    pub fn records(payload: String, count: usize) -> Self {
        let outcome = if count == 0 {
            JobOutcome::NotFound
        } else {
            JobOutcome::Found { records: count }
        };
        Self { payload, outcome }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            payload: String::new(),
            outcome: JobOutcome::Failed {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, JobOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Submitted and still running (or queued).
    Pending,
    /// A result is waiting to be read.
    Ready,
    /// Never issued, or already read.
    Unknown,
}

enum Slot {
    Pending,
    Ready(Completed),
}

#[derive(Default)]
pub struct ResultStore {
    slots: Mutex<HashMap<Ticket, Slot>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_pending(&self, ticket: Ticket) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(Slot::Ready(_)) = slots.insert(ticket, Slot::Pending) {
            log::warn!("ticket {} reissued before its result was read", ticket);
        }
    }

    pub fn deposit(&self, ticket: Ticket, completed: Completed) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(Slot::Ready(_)) = slots.insert(ticket, Slot::Ready(completed)) {
            log::warn!("ticket {} already had an unread result; replaced", ticket);
        }
    }

    /// Remove and return the payload if the result is ready.
    pub fn poll(&self, ticket: Ticket) -> Option<String> {
        self.take(ticket).map(|c| c.payload)
    }

    /// Remove and return the full result if ready.
    pub fn take(&self, ticket: Ticket) -> Option<Completed> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if !matches!(slots.get(&ticket), Some(Slot::Ready(_))) {
            return None;
        }
        match slots.remove(&ticket) {
            Some(Slot::Ready(completed)) => Some(completed),
            _ => None,
        }
    }

    pub fn status(&self, ticket: Ticket) -> PollStatus {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get(&ticket) {
            Some(Slot::Pending) => PollStatus::Pending,
            Some(Slot::Ready(_)) => PollStatus::Ready,
            None => PollStatus::Unknown,
        }
    }

    /// Entries currently held, pending or ready.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
