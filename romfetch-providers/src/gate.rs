use std::sync::Arc;
use std::time::Duration;

use romfetch_core::ProviderError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Capacity-bounded permit shared by every provider of a profile to
/// throttle outbound calls.
///
/// Waiting is bounded by a timeout; a lookup that cannot get a permit in
/// time fails with a retryable error instead of hanging.
#[derive(Debug, Clone)]
pub struct OutboundGate {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl OutboundGate {
    pub fn new(permits: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(permits.max(1))),
            timeout,
        }
    }

    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, ProviderError> {
        let permits = Arc::clone(&self.permits);
        match tokio::time::timeout(self.timeout, permits.acquire_owned()).await {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_)) => Err(ProviderError::Closed("outbound gate")),
            Err(_) => Err(ProviderError::transient(format!(
                "no outbound permit within {:?}",
                self.timeout
            ))),
        }
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Fail current and future waiters.
    pub fn close(&self) {
        self.permits.close();
    }
}

#[cfg(test)]
#[path = "tests/gate_tests.rs"]
mod tests;
