use crate::solver::{clamp_size, Solver};
use crate::Result;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Caller-owned reuse of built solvers, keyed by (clamped) board size.
///
/// Flip-action tables run to 128 MiB at size 5, so the pool is LRU-bounded
/// rather than unbounded. Construction happens under the lock, so at most
/// one table build per pool is in flight; the solvers handed out are
/// immutable and freely shareable.
pub struct SolverPool {
    solvers: Mutex<LruCache<usize, Arc<Solver>>>,
    cache_dir: PathBuf,
}

impl SolverPool {
    /// Pool holding at most `capacity` solvers, with table caches in the
    /// current directory. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self::with_cache_dir(capacity, ".")
    }

    pub fn with_cache_dir(capacity: usize, cache_dir: impl Into<PathBuf>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            solvers: Mutex::new(LruCache::new(capacity)),
            cache_dir: cache_dir.into(),
        }
    }

    /// Returns the solver for `size`, building it on first request.
    pub fn get(&self, size: usize) -> Result<Arc<Solver>> {
        let size = clamp_size(size);
        let mut solvers = self.solvers.lock();
        if let Some(solver) = solvers.get(&size) {
            debug!("reusing solver for size {size}");
            return Ok(Arc::clone(solver));
        }
        let solver = Arc::new(Solver::with_cache_dir(size, &self.cache_dir)?);
        solvers.put(size, Arc::clone(&solver));
        Ok(solver)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn len(&self) -> usize {
        self.solvers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.solvers.lock().is_empty()
    }
}

impl Default for SolverPool {
    /// Two resident solvers: enough for a UI hopping between sizes without
    /// pinning several large tables.
    fn default() -> Self {
        Self::new(2)
    }
}
