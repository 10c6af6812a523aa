//! Extension-based selection of files.

use crate::content::file_extension;
use std::collections::BTreeSet;

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;

/// Admits or rejects paths by file extension.
///
/// Extensions are compared case-insensitively and may be given with or without the
/// leading `.`. Exclusion always wins; an empty include set admits everything not
/// excluded.
///
/// # Examples
///
/// ```
/// use repo_flattener_core::ExtensionFilter;
///
/// let filter = ExtensionFilter::new()
///     .including(["rs", ".toml"])
///     .excluding([".lock"]);
///
/// assert!(filter.allows("src/main.rs"));
/// assert!(filter.allows("Cargo.TOML"));
/// assert!(!filter.allows("Cargo.lock"));
/// assert!(!filter.allows("README.md"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl ExtensionFilter {
    /// A filter that admits every path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn including<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include.extend(normalize_all(extensions));
        self
    }

    pub fn excluding<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude.extend(normalize_all(extensions));
        self
    }

    /// Returns true if `path` passes the filter.
    pub fn allows(&self, path: &str) -> bool {
        let extension = file_extension(path).to_lowercase();
        if self.exclude.contains(&extension) {
            return false;
        }
        self.include.is_empty() || self.include.contains(&extension)
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

fn normalize_all<I, S>(extensions: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions.into_iter().filter_map(|extension| {
        let trimmed = extension.as_ref().trim().trim_start_matches('.').to_lowercase();
        if trimmed.is_empty() {
            None
        } else {
            Some(format!(".{}", trimmed))
        }
    })
}
