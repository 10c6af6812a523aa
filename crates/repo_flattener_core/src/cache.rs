//! Bounded, memoising caches for upstream lookups.
//!
//! Every table is an LRU keyed by a struct that holds each argument affecting the
//! result. Lookups that name an immutable commit or tree sha never go stale, so only
//! the default branch table carries a time-to-live.
//!
//! # Examples
//!
//! ```
//! use repo_flattener_core::MemoCache;
//!
//! let cache: MemoCache<String, u64> = MemoCache::new("sizes", 2);
//! cache.insert("a".to_string(), 1);
//!
//! assert_eq!(cache.get(&"a".to_string()), Some(1));
//! assert_eq!(cache.get(&"b".to_string()), None);
//!
//! let stats = cache.statistics();
//! assert_eq!(stats.cache_hits, 1);
//! assert_eq!(stats.cache_misses, 1);
//! ```

use crate::config::FlattenerConfig;
use crate::content::FileContent;
use github_client::GitTree;
use lru::LruCache;
use std::collections::BTreeMap;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

/// Cache performance statistics.
///
/// # Examples
///
/// ```
/// use repo_flattener_core::CacheStatistics;
///
/// let stats = CacheStatistics {
///     total_requests: 100,
///     cache_hits: 75,
///     cache_misses: 25,
///     evictions: 0,
///     cached_entries: 10,
/// };
///
/// assert_eq!(stats.hit_ratio(), 0.75);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Entries pushed out because the table was full.
    pub evictions: u64,
    pub cached_entries: usize,
}

impl CacheStatistics {
    /// Fraction of lookups served from the cache, `0.0` when nothing was looked up.
    pub fn hit_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

struct Slot<V> {
    value: V,
    stored_at: Instant,
}

struct Table<K: Hash + Eq, V> {
    entries: LruCache<K, Slot<V>>,
    stats: CacheStatistics,
}

/// A thread-safe LRU table with optional expiry.
///
/// Values are cloned out on every hit, so large values should be wrapped in `Arc`.
pub struct MemoCache<K: Hash + Eq, V: Clone> {
    name: &'static str,
    ttl: Option<Duration>,
    table: Mutex<Table<K, V>>,
}

impl<K: Hash + Eq, V: Clone> std::fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("stats", &self.statistics())
            .finish()
    }
}

impl<K: Hash + Eq, V: Clone> MemoCache<K, V> {
    /// Creates an empty table holding at most `capacity` entries (at least one).
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            ttl: None,
            table: Mutex::new(Table {
                entries: LruCache::new(capacity),
                stats: CacheStatistics::default(),
            }),
        }
    }

    /// Expires entries `ttl` after they were stored.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the cached value for `key`, if present and not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut table = self.lock();
        table.stats.total_requests += 1;

        let lookup = table.entries.get(key).map(|slot| {
            let expired = self
                .ttl
                .is_some_and(|ttl| slot.stored_at.elapsed() >= ttl);
            (slot.value.clone(), expired)
        });

        match lookup {
            Some((value, false)) => {
                table.stats.cache_hits += 1;
                Some(value)
            }
            Some((_, true)) => {
                table.entries.pop(key);
                table.stats.cache_misses += 1;
                table.stats.cached_entries = table.entries.len();
                debug!(cache = self.name, "Cache entry expired");
                None
            }
            None => {
                table.stats.cache_misses += 1;
                None
            }
        }
    }

    /// Stores `value` under `key`, evicting the least recently used entry when full.
    pub fn insert(&self, key: K, value: V) {
        let mut table = self.lock();
        let full = table.entries.len() == table.entries.cap().get();
        if full && !table.entries.contains(&key) {
            table.stats.evictions += 1;
        }
        table.entries.put(
            key,
            Slot {
                value,
                stored_at: Instant::now(),
            },
        );
        table.stats.cached_entries = table.entries.len();
    }

    /// Returns the cached value or runs `load` and caches its successful result.
    ///
    /// The lock is not held while `load` runs, so two concurrent misses for the same
    /// key may both reach upstream. Failures are never cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            debug!(cache = self.name, "Cache hit");
            return Ok(value);
        }

        debug!(cache = self.name, "Cache miss");
        let value = load().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry. Statistics other than the entry count are kept.
    pub fn clear(&self) {
        let mut table = self.lock();
        table.entries.clear();
        table.stats.cached_entries = 0;
    }

    /// Returns a snapshot of this table's statistics.
    pub fn statistics(&self) -> CacheStatistics {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, Table<K, V>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Key for lookups scoped to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoKey {
    owner: String,
    repo: String,
}

impl RepoKey {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

/// Key for a tree listing; `recursive` listings and single levels are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeKey {
    owner: String,
    repo: String,
    sha: String,
    recursive: bool,
}

impl TreeKey {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        sha: impl Into<String>,
        recursive: bool,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            sha: sha.into(),
            recursive,
        }
    }
}

/// Key for the content of one file at one commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey {
    owner: String,
    repo: String,
    path: String,
    commit: String,
}

impl ContentKey {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
            commit: commit.into(),
        }
    }
}

/// Statistics for every table of a [`ForgeCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForgeCacheStatistics {
    pub default_branches: CacheStatistics,
    pub trees: CacheStatistics,
    pub contents: CacheStatistics,
    pub languages: CacheStatistics,
}

/// The caches shared by the resolver, walker and fetcher of one flattener.
#[derive(Debug)]
pub struct ForgeCache {
    pub(crate) default_branches: MemoCache<RepoKey, String>,
    pub(crate) trees: MemoCache<TreeKey, Arc<GitTree>>,
    pub(crate) contents: MemoCache<ContentKey, Arc<FileContent>>,
    pub(crate) languages: MemoCache<RepoKey, Arc<BTreeMap<String, u64>>>,
}

impl ForgeCache {
    pub fn new(config: &FlattenerConfig) -> Self {
        Self {
            default_branches: MemoCache::new("default_branches", config.metadata_cache_capacity)
                .with_ttl(config.default_branch_ttl),
            trees: MemoCache::new("trees", config.metadata_cache_capacity),
            contents: MemoCache::new("contents", config.content_cache_capacity),
            languages: MemoCache::new("languages", config.metadata_cache_capacity),
        }
    }

    pub fn statistics(&self) -> ForgeCacheStatistics {
        ForgeCacheStatistics {
            default_branches: self.default_branches.statistics(),
            trees: self.trees.statistics(),
            contents: self.contents.statistics(),
            languages: self.languages.statistics(),
        }
    }

    pub fn clear(&self) {
        self.default_branches.clear();
        self.trees.clear();
        self.contents.clear();
        self.languages.clear();
    }
}
