//! Worker budget shared by all artifact downloads of one run.
//!
//! Each artifact task holds one permit for its whole network + disk phase, so
//! the number of transfers in flight never exceeds the budget's capacity.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::FetchError;

/// Default number of concurrent artifact downloads.
pub const DEFAULT_WORKERS: usize = 16;

/// Fixed-size pool of download permits. Cheap to clone; clones share permits.
#[derive(Debug, Clone)]
pub struct WorkerBudget {
    capacity: usize,
    permits: Arc<Semaphore>,
}

impl WorkerBudget {
    /// Create a budget with `capacity` permits (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            permits: Arc::new(Semaphore::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by a task.
    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        self.permits.available_permits()
    }

    #[cfg(test)]
    pub(crate) fn in_use(&self) -> usize {
        self.capacity - self.available()
    }

    /// Wait for a permit. It is returned to the pool when the guard is dropped.
    /// Fails with [`FetchError::Cancelled`] once the budget has been closed.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, FetchError> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| FetchError::Cancelled)
    }

    /// Stop handing out permits; current and future waiters fail immediately.
    /// Permits already held stay valid until dropped.
    pub fn close(&self) {
        self.permits.close();
    }
}

impl Default for WorkerBudget {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}
