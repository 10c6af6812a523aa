//! Parsing of repository URLs into owner, name and optional ref.

use crate::errors::{Error, FlattenResult};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

#[cfg(test)]
#[path = "repo_ref_tests.rs"]
mod tests;

/// How the segments after `/tree/` are turned into a ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefStyle {
    /// Only the segment directly after `tree`.
    Single,
    /// Every segment after `tree`, joined with `/`.
    Nested,
}

/// A repository on the forge, optionally pinned to a branch, tag or commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    owner: String,
    repo: String,
    reference: Option<String>,
}

impl RepoRef {
    /// Creates a reference to `owner/repo` without a ref.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if either part is empty.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> FlattenResult<Self> {
        let owner = owner.into();
        let repo = repo.into();
        if owner.trim().is_empty() || repo.trim().is_empty() {
            return Err(Error::InvalidUrl(format!(
                "owner and repository must not be empty (got '{}/{}')",
                owner, repo
            )));
        }
        Ok(Self {
            owner,
            repo,
            reference: None,
        })
    }

    /// Pins this reference to a branch name or commit hash.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        self.reference = if reference.trim().is_empty() {
            None
        } else {
            Some(reference)
        };
        self
    }

    /// Parses a repository URL such as `https://github.com/octo/demo/tree/main`.
    ///
    /// The first two path segments are the owner and the repository (a trailing
    /// `.git` is removed). When the third segment is `tree`, the fourth is the ref.
    /// Scheme-less input like `github.com/octo/demo` is accepted, as is a bare
    /// path such as `/octo/demo/tree/dev`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the input is not a URL or has fewer than two
    /// path segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use repo_flattener_core::RepoRef;
    ///
    /// let repo = RepoRef::parse("https://github.com/octo/demo/tree/dev").unwrap();
    /// assert_eq!(repo.owner(), "octo");
    /// assert_eq!(repo.repo(), "demo");
    /// assert_eq!(repo.reference(), Some("dev"));
    /// ```
    pub fn parse(url: &str) -> FlattenResult<Self> {
        Self::parse_with(url, RefStyle::Single)
    }

    /// Parses a repository URL, treating everything after `tree` as the ref.
    ///
    /// This keeps branch names containing `/` intact, so
    /// `https://github.com/octo/demo/tree/feature/login` pins `feature/login`.
    ///
    /// The flattener itself uses [`RepoRef::parse`]; callers that know their
    /// branch names contain `/` parse with this and pass the ref explicitly.
    pub fn parse_nested(url: &str) -> FlattenResult<Self> {
        Self::parse_with(url, RefStyle::Nested)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Renders `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn parse_with(url: &str, style: RefStyle) -> FlattenResult<Self> {
        let segments = path_segments(url)?;
        if segments.len() < 2 {
            return Err(Error::InvalidUrl(format!(
                "{} does not name an owner and a repository",
                url.trim()
            )));
        }

        let owner = segments[0].clone();
        let repo = segments[1]
            .strip_suffix(".git")
            .unwrap_or(&segments[1])
            .to_string();
        let repo_ref = Self::new(owner, repo).map_err(|_| {
            Error::InvalidUrl(format!(
                "{} does not name an owner and a repository",
                url.trim()
            ))
        })?;

        let reference = match segments.get(2).map(String::as_str) {
            Some("tree") if segments.len() > 3 => match style {
                RefStyle::Single => Some(segments[3].clone()),
                RefStyle::Nested => Some(segments[3..].join("/")),
            },
            _ => None,
        };

        Ok(match reference {
            Some(reference) => repo_ref.with_reference(reference),
            None => repo_ref,
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reference {
            Some(reference) => write!(f, "{}/{}@{}", self.owner, self.repo, reference),
            None => write!(f, "{}/{}", self.owner, self.repo),
        }
    }
}

/// Splits the path of `input` into decoded, non-empty segments.
///
/// Input without a scheme is read as `host/path` when its first segment looks
/// like a host and as a bare `owner/repo/...` path otherwise.
fn path_segments(input: &str) -> FlattenResult<Vec<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("repository URL is empty".to_string()));
    }

    if let Ok(url) = Url::parse(trimmed) {
        if url.has_host() {
            return Ok(decode_segments(url.path()));
        }
    }

    let relative = trimmed.trim_start_matches('/');
    let first = relative.split(['/', '?', '#']).next().unwrap_or_default();
    if looks_like_host(first) {
        let url = Url::parse(&format!("https://{}", relative))
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", trimmed, e)))?;
        return Ok(decode_segments(url.path()));
    }

    let path = relative.split(['?', '#']).next().unwrap_or_default();
    Ok(decode_segments(path))
}

fn looks_like_host(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment.eq_ignore_ascii_case("localhost")
}

fn decode_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .collect()
}
