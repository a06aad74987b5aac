//! Concurrent compilation cache.
//!
//! Maps canonical keys to compiled artifacts. Entries are inserted once and
//! never replaced or evicted, so the cache grows with the number of distinct
//! shapes seen, not with the number of expressions.
//!
//! # Publication
//!
//! Compilation runs outside any map lock. When two threads miss on the same
//! key, both compile, and the candidate published first wins. The loser
//! drops its own candidate and returns the winner's, so every caller ends up
//! with the single visible artifact for that key.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mold_eval::Artifact;
use mold_shape::CanonicalKey;
use rustc_hash::FxBuildHasher;
use tracing::debug;

/// Global compilation cache singleton.
static GLOBAL_CACHE: OnceLock<Arc<CompilationCache>> = OnceLock::new();

/// Counters describing cache activity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct shapes with a published artifact.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Times a compile function was invoked.
    pub compiles: u64,
    /// Compiled candidates discarded because another thread published first.
    pub races_lost: u64,
}

/// Canonical key to artifact map with insert-if-absent publication.
pub struct CompilationCache {
    entries: DashMap<CanonicalKey, Arc<Artifact>, FxBuildHasher>,
    hits: AtomicU64,
    compiles: AtomicU64,
    races_lost: AtomicU64,
}

impl CompilationCache {
    /// Create an isolated, empty cache.
    pub fn new() -> Self {
        CompilationCache {
            entries: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
            compiles: AtomicU64::new(0),
            races_lost: AtomicU64::new(0),
        }
    }

    /// The process-wide cache. Created on first use and never torn down.
    pub fn global() -> Arc<CompilationCache> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(CompilationCache::new())))
    }

    /// Look up the artifact for `key`.
    pub fn get(&self, key: &CanonicalKey) -> Option<Arc<Artifact>> {
        let hit = self.entries.get(key).map(|entry| Arc::clone(entry.value()));
        if hit.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Whether an artifact is published for `key`. Leaves the statistics
    /// untouched.
    pub fn contains(&self, key: &CanonicalKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            compiles: self.compiles.load(Ordering::Relaxed),
            races_lost: self.races_lost.load(Ordering::Relaxed),
        }
    }

    /// Return the artifact for `key`, compiling it on a miss.
    ///
    /// `compile` runs without any lock held and is not called on a hit. If
    /// it fails, nothing is inserted and the error is returned. If another
    /// thread publishes an artifact for `key` while `compile` runs, that
    /// artifact is returned and the local one is dropped.
    pub fn get_or_compile<E>(
        &self,
        key: CanonicalKey,
        compile: impl FnOnce() -> Result<Artifact, E>,
    ) -> Result<Arc<Artifact>, E> {
        if let Some(artifact) = self.get(&key) {
            return Ok(artifact);
        }

        self.compiles.fetch_add(1, Ordering::Relaxed);
        let candidate = Arc::new(compile()?);

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.races_lost.fetch_add(1, Ordering::Relaxed);
                debug!(
                    shape_hash = entry.key().shape_hash(),
                    "lost publication race; using the published artifact"
                );
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                debug!(shape_hash = entry.key().shape_hash(), "published new shape");
                entry.insert(Arc::clone(&candidate));
                Ok(candidate)
            }
        }
    }
}

impl Default for CompilationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompilationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationCache")
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests;
