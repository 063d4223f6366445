use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-artifact-path async locks.
///
/// The compiler always writes `<stem>.pdf` into the output directory, so two
/// requests rendering the same template into the same directory would race on
/// that name. Holding an [`ArtifactLease`] for the target path from before the
/// final rename until the caller is done with the file serialises them.
///
/// Paths are compared as given; callers pass canonical paths.
#[derive(Debug, Clone, Default)]
pub struct ArtifactLocks {
    locks: Arc<Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>>,
}

/// Exclusive hold on one artifact path. Released on drop.
#[derive(Debug)]
pub struct ArtifactLease {
    path: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl ArtifactLease {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other lease for `path` is held.
    pub async fn acquire(&self, path: &Path) -> ArtifactLease {
        let lock = self.lock_for(path);
        ArtifactLease {
            path: path.to_path_buf(),
            _guard: lock.lock_owned().await,
        }
    }

    /// Acquires leases for several paths. Duplicates are collapsed and the
    /// locks are taken in sorted order, so overlapping callers cannot
    /// deadlock against each other.
    pub async fn acquire_all<'a, I>(&self, paths: I) -> Vec<ArtifactLease>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut paths: Vec<&Path> = paths.into_iter().collect();
        paths.sort();
        paths.dedup();

        let mut leases = Vec::with_capacity(paths.len());
        for path in paths {
            leases.push(self.acquire(path).await);
        }
        leases
    }

    /// Number of paths with a lease held or awaited.
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.values().filter(|lock| Arc::strong_count(lock) > 1).count()
    }

    fn lock_for(&self, path: &Path) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Entries only the registry refers to are idle.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }
}
