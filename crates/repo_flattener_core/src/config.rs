//! Tunables for the repository flattener.

use std::time::Duration;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Largest blob, in bytes, that appears in a tree listing.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Entries kept per metadata table (default branches, trees, languages).
pub const DEFAULT_METADATA_CACHE_CAPACITY: usize = 100;

/// Entries kept in the file content table.
pub const DEFAULT_CONTENT_CACHE_CAPACITY: usize = 1000;

/// How long a resolved default branch is trusted before it is looked up again.
pub const DEFAULT_BRANCH_TTL: Duration = Duration::from_secs(5 * 60);

/// Number of file fetches in flight for a single request.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Configuration for [`crate::RepositoryFlattener`].
///
/// # Examples
///
/// ```
/// use repo_flattener_core::FlattenerConfig;
///
/// let config = FlattenerConfig::default()
///     .with_max_file_size(512 * 1024)
///     .with_fetch_concurrency(4);
///
/// assert_eq!(config.max_file_size, 512 * 1024);
/// assert_eq!(config.content_cache_capacity, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenerConfig {
    /// Blobs larger than this are dropped from every listing.
    pub max_file_size: u64,

    /// Capacity of the default branch, tree and language tables.
    pub metadata_cache_capacity: usize,

    /// Capacity of the file content table.
    pub content_cache_capacity: usize,

    /// Lifetime of a cached default branch.
    pub default_branch_ttl: Duration,

    /// Upper bound on concurrent per-file fetches.
    pub fetch_concurrency: usize,
}

impl Default for FlattenerConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            metadata_cache_capacity: DEFAULT_METADATA_CACHE_CAPACITY,
            content_cache_capacity: DEFAULT_CONTENT_CACHE_CAPACITY,
            default_branch_ttl: DEFAULT_BRANCH_TTL,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

impl FlattenerConfig {
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_metadata_cache_capacity(mut self, capacity: usize) -> Self {
        self.metadata_cache_capacity = capacity.max(1);
        self
    }

    pub fn with_content_cache_capacity(mut self, capacity: usize) -> Self {
        self.content_cache_capacity = capacity.max(1);
        self
    }

    pub fn with_default_branch_ttl(mut self, ttl: Duration) -> Self {
        self.default_branch_ttl = ttl;
        self
    }

    /// Sets the fan-out for per-file fetches. Zero is treated as one.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }
}
