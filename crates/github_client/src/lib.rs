//! Crate for reading repository data from the GitHub REST API.
//!
//! This crate provides the `ForgeApi` trait, the minimal set of read-only upstream
//! operations the flattener needs, and `GitHubClient`, its implementation on top of
//! `octocrab` authenticated with a bearer token. Every upstream call is bounded by
//! a timeout and every non-success response is classified into [`Error`].

use async_trait::async_trait;
use octocrab::Octocrab;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

pub mod errors;
pub use errors::Error;

pub mod contents;
pub use contents::{FileContents, GitObjectType, GitTree, GitTreeItem};

pub mod models;
pub use models::{CommitInfo, RepositoryMetadata};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Default base URI of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default timeout applied to every upstream request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Characters left unescaped in a path segment or query value.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Read-only operations against a Git forge.
///
/// This trait is the seam between the flattener core and the network. It allows
/// the core to be tested with in-memory implementations.
#[async_trait]
pub trait ForgeApi: Send + Sync {
    /// Fetches repository metadata, including the default branch.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the repository does not exist or is not visible
    /// to the credential.
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryMetadata, Error>;

    /// Fetches the commit a branch name or commit hash points to.
    async fn get_commit(&self, owner: &str, repo: &str, reference: &str)
        -> Result<CommitInfo, Error>;

    /// Fetches a git tree by commit or tree sha.
    ///
    /// When `recursive` is set the listing contains every descendant of the tree.
    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> Result<GitTree, Error>;

    /// Fetches the base64 encoded contents of a file at the given ref.
    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<FileContents, Error>;

    /// Lists the languages of a repository with their byte counts.
    async fn list_languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>, Error>;
}

/// A client for reading from the GitHub API, authenticated with a bearer token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
    timeout: Duration,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` using the default request timeout.
    ///
    /// # Arguments
    ///
    /// * `client` - An `Octocrab` instance, usually created by [`create_token_client`].
    pub fn new(client: Octocrab) -> Self {
        Self {
            client,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Replaces the timeout applied to each upstream request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the timeout applied to each upstream request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues a GET request and deserializes the JSON response.
    ///
    /// `resource` names the requested object in `NotFound` errors and logs.
    async fn get_json<R>(&self, route: String, resource: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        debug!(route = %route, "Sending GitHub API request");

        let request = self.client.get::<R, _, _>(&route, None::<&()>);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let classified = classify_octocrab_error(&e, resource);
                log_octocrab_error(&format!("Request for {} failed", resource), e);
                Err(classified)
            }
            Err(_) => {
                warn!(
                    resource = resource,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "GitHub API request timed out"
                );
                Err(Error::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl ForgeApi for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryMetadata, Error> {
        let route = format!("/repos/{}/{}", encode(owner), encode(repo));
        self.get_json(route, &format!("{}/{}", owner, repo)).await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, reference = %reference))]
    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<CommitInfo, Error> {
        let route = format!(
            "/repos/{}/{}/commits/{}",
            encode(owner),
            encode(repo),
            encode(reference)
        );
        self.get_json(route, &format!("{}/{}@{}", owner, repo, reference))
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, tree_sha = %tree_sha))]
    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> Result<GitTree, Error> {
        let mut route = format!(
            "/repos/{}/{}/git/trees/{}",
            encode(owner),
            encode(repo),
            encode(tree_sha)
        );
        if recursive {
            route.push_str("?recursive=1");
        }
        self.get_json(route, &format!("tree {} in {}/{}", tree_sha, owner, repo))
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path))]
    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<FileContents, Error> {
        let route = format!(
            "/repos/{}/{}/contents/{}?ref={}",
            encode(owner),
            encode(repo),
            encode_path(path),
            encode(reference)
        );
        self.get_json(route, &format!("{} in {}/{}@{}", path, owner, repo, reference))
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>, Error> {
        let route = format!("/repos/{}/{}/languages", encode(owner), encode(repo));
        self.get_json(route, &format!("{}/{}", owner, repo)).await
    }
}

/// Creates an `Octocrab` client that sends the given token as a bearer credential.
///
/// # Arguments
///
/// * `token` - Personal access or installation token, used verbatim
/// * `base_uri` - Root of the REST API, e.g. [`DEFAULT_API_URL`]
///
/// # Errors
///
/// Returns `Error::AuthError` if the base URI is invalid or the client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient, DEFAULT_API_URL};
///
/// # fn example() -> Result<(), github_client::Error> {
/// let octocrab = create_token_client("ghp_example", DEFAULT_API_URL)?;
/// let client = GitHubClient::new(octocrab);
/// # Ok(())
/// # }
/// ```
#[instrument(skip(token))]
pub fn create_token_client(token: &str, base_uri: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|e| {
            error!(base_uri = base_uri, error = %e, "Invalid GitHub API base URI");
            Error::AuthError(format!("Invalid GitHub API base URI: {}", base_uri))
        })?
        .personal_token(token.to_string())
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to build Octocrab client");
            Error::AuthError("Failed to initialize GitHub client.".to_string())
        })
}

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Percent-encodes each segment of a repository path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn classify_octocrab_error(e: &octocrab::Error, resource: &str) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            Error::from_status(source.status_code, &source.message, resource)
        }
        octocrab::Error::Serde { source, .. } => {
            Error::InvalidResponse(format!("{} could not be parsed: {}", resource, source))
        }
        octocrab::Error::Json { source, .. } => {
            Error::InvalidResponse(format!("{} could not be parsed: {}", resource, source))
        }
        other => Error::Upstream {
            status: None,
            message: other.to_string(),
        },
    }
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            let err = source;
            error!(
                error_message = err.message,
                status = err.status_code.as_u16(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
