use std::sync::Arc;

use crate::foundation::error::{GifError, GifResult};

/// Default pool size: hardware parallelism plus one.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        + 1
}

/// Long-lived worker pool shared by render calls.
///
/// Clones share the same underlying threads. The pool is never resized; each render call submits
/// its own jobs and does not assume the pool is idle.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    inner: Arc<rayon::ThreadPool>,
}

impl WorkerPool {
    /// Build a pool with [`default_pool_size`] threads.
    pub fn new() -> GifResult<Self> {
        Self::with_threads(None)
    }

    /// Build a pool with an explicit thread count (`None` selects the default).
    pub fn with_threads(threads: Option<usize>) -> GifResult<Self> {
        if let Some(n) = threads
            && n == 0
        {
            return Err(GifError::configuration(
                "worker pool 'threads' must be >= 1 when set",
            ));
        }
        let n = threads.unwrap_or_else(default_pool_size);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|i| format!("petgif-worker-{i}"))
            .build()
            .map_err(|e| GifError::configuration(format!("failed to build worker pool: {e}")))?;
        tracing::debug!(threads = n, "worker pool started");
        Ok(Self {
            inner: Arc::new(pool),
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.inner.current_num_threads()
    }

    pub(crate) fn rayon(&self) -> &rayon::ThreadPool {
        &self.inner
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
