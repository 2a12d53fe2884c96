//! Ticket issuing and job launch.
//!
//! `submit` never waits on the job: it takes the next ticket, marks it
//! pending and spawns the job on the runtime. At most `max_in_flight` jobs
//! run at once; the rest wait for a permit inside their own task.
//!
//! Every spawned job owns a [`DepositGuard`] created before the task is
//! spawned. Whatever happens to the job (normal return, panic, or the task
//! being dropped by runtime shutdown) the guard deposits exactly one result
//! for the ticket.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::Semaphore;

use crate::store::{Completed, FailureKind, ResultStore};

/// Correlation id handed back by `submit`.
pub type Ticket = i32;

/// Process-wide ticket counter. Starts at 0 and wraps at `i32::MAX`.
#[derive(Debug, Default)]
pub struct TicketCounter {
    next: Mutex<Ticket>,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn starting_at(first: Ticket) -> Self {
        Self {
            next: Mutex::new(first),
        }
    }

    pub fn next(&self) -> Ticket {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let ticket = *next;
        *next = next.wrapping_add(1);
        ticket
    }
}

/// Deposits a result for its ticket when dropped.
struct DepositGuard {
    store: Arc<ResultStore>,
    ticket: Ticket,
    completed: Option<Completed>,
}

impl DepositGuard {
    fn new(store: Arc<ResultStore>, ticket: Ticket) -> Self {
        Self {
            store,
            ticket,
            completed: None,
        }
    }

    fn complete(&mut self, completed: Completed) {
        self.completed = Some(completed);
    }
}

impl Drop for DepositGuard {
    fn drop(&mut self) {
        let completed = self.completed.take().unwrap_or_else(|| {
            log::error!("ticket {}: job ended without a result", self.ticket);
            Completed::failed(FailureKind::Internal, "job ended without a result")
        });
        self.store.deposit(self.ticket, completed);
    }
}

pub struct Dispatcher {
    handle: Handle,
    counter: TicketCounter,
    store: Arc<ResultStore>,
    limit: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(handle: Handle, store: Arc<ResultStore>, max_in_flight: usize) -> Self {
        Self::with_counter(handle, store, max_in_flight, TicketCounter::new())
    }

    pub(crate) fn with_counter(
        handle: Handle,
        store: Arc<ResultStore>,
        max_in_flight: usize,
        counter: TicketCounter,
    ) -> Self {
        Self {
            handle,
            counter,
            store,
            limit: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Issue a ticket and launch `job` for it.
    pub fn submit<F, Fut>(&self, job: F) -> Ticket
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = Completed> + Send + 'static,
    {
        let ticket = self.counter.next();
        self.store.mark_pending(ticket);

        let guard = DepositGuard::new(Arc::clone(&self.store), ticket);
        let limit = Arc::clone(&self.limit);
        self.handle.spawn(async move {
            let mut guard = guard;
            let Ok(_permit) = limit.acquire_owned().await else {
                guard.complete(Completed::failed(
                    FailureKind::Internal,
                    "dispatcher is shut down",
                ));
                return;
            };
            let completed = job(ticket).await;
            guard.complete(completed);
        });

        log::debug!("ticket {} submitted", ticket);
        ticket
    }

    /// Jobs that could start right now without waiting for a permit.
    pub fn free_slots(&self) -> usize {
        self.limit.available_permits()
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
