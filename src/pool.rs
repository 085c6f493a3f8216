//! Fixed-concurrency task dispatcher for file transfers.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("task pool concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Runs submitted tasks with at most `concurrency` of them in flight.
///
/// Tasks carry their own error handling: `submit` has no error channel and a
/// panicking task is logged by [`TaskPool::wait`] without affecting the others.
/// `wait` consumes the pool, so it cannot be reused afterwards.
pub struct TaskPool {
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
}

/// Outcome of [`TaskPool::wait`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub completed: usize,
    pub panicked: usize,
}

impl TaskPool {
    pub fn new(concurrency: u32) -> Result<Self, PoolError> {
        if concurrency == 0 {
            return Err(PoolError::ZeroConcurrency);
        }

        Ok(Self {
            permits: Arc::new(Semaphore::new(concurrency as usize)),
            tasks: JoinSet::new(),
        })
    }

    /// Waits for a free slot, then starts `task` in the background.
    pub async fn submit<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // The semaphore is owned by the pool and never closed.
        let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
            tracing::error!("task pool semaphore closed; dropping task");
            return;
        };

        self.tasks.spawn(async move {
            // Dropped on completion or unwind, freeing the slot either way.
            let _permit = permit;
            task.await;
        });
    }

    /// Number of tasks submitted and not yet collected.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Blocks until every submitted task has finished.
    pub async fn wait(mut self) -> PoolReport {
        let mut report = PoolReport::default();

        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(()) => report.completed += 1,
                Err(err) if err.is_panic() => {
                    tracing::error!("transfer task panicked: {err}");
                    report.panicked += 1;
                }
                Err(err) => {
                    tracing::warn!("transfer task cancelled: {err}");
                    report.panicked += 1;
                }
            }
        }

        report
    }
}
