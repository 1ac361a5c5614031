//! Data-parallel index loops over a rayon pool.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{ClusterError, ClusterResult};

/// Runs `f(0..count)` across worker threads.
///
/// Uses a dedicated pool when one was built with [`WorkerPool::with_threads`],
/// the rayon global pool otherwise. Each call returns only after every index
/// has completed, which is the only synchronisation the algorithms rely on.
#[derive(Clone, Default)]
pub struct WorkerPool {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads())
            .field("dedicated", &self.pool.is_some())
            .finish()
    }
}

impl WorkerPool {
    /// Share the rayon global pool.
    pub fn global() -> Self {
        Self::default()
    }

    /// Build a dedicated pool. `0` threads means one per CPU.
    pub fn with_threads(threads: usize) -> ClusterResult<Self> {
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cluster-worker-{i}"))
            .build()
            .map_err(|e| ClusterError::ThreadPool {
                reason: e.to_string(),
            })?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Evaluate `f` for every index in `0..count`, possibly concurrently,
    /// and collect the results in index order.
    pub fn parallelize<T, F>(&self, count: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        let run = || (0..count).into_par_iter().map(&f).collect();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}
