//! Fetching and decoding of individual files.

use crate::cache::{ContentKey, ForgeCache};
use crate::errors::{Error, FlattenResult};
use crate::repo_ref::RepoRef;
use crate::resolver::CommitRef;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use github_client::{FileContents, ForgeApi};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;

/// The decoded content of a file at a specific commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub path: String,
    /// UTF-8 text, or a placeholder naming the file when it is binary.
    pub content: String,
    /// `.` plus the text after the last `.` of the file name, or empty.
    pub extension: String,
    /// Decoded size in bytes.
    pub size: u64,
    pub is_binary: bool,
}

impl FileContent {
    /// Builds the content of `path` from raw bytes.
    ///
    /// Bytes that are not valid UTF-8 are replaced by a placeholder naming the file
    /// and its size.
    pub fn from_bytes(path: &str, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        let (content, is_binary) = match String::from_utf8(bytes) {
            Ok(text) => (text, false),
            Err(_) => (binary_placeholder(path, size), true),
        };
        Self {
            path: path.to_string(),
            content,
            extension: file_extension(path),
            size,
            is_binary,
        }
    }
}

/// Text standing in for the content of a binary file.
pub fn binary_placeholder(path: &str, size: u64) -> String {
    format!("Binary file: {} (size: {} bytes)", path, size)
}

/// Returns `.` plus the text after the last `.` in the file name of `path`.
///
/// ```
/// use repo_flattener_core::file_extension;
///
/// assert_eq!(file_extension("src/main.rs"), ".rs");
/// assert_eq!(file_extension("archive.tar.gz"), ".gz");
/// assert_eq!(file_extension("Makefile"), "");
/// assert_eq!(file_extension("v1.2/Dockerfile"), "");
/// ```
pub fn file_extension(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(index) => name[index..].to_string(),
        None => String::new(),
    }
}

/// Reads file contents at a commit, memoised per (repository, path, commit).
pub struct ContentFetcher {
    forge: Arc<dyn ForgeApi>,
    cache: Arc<ForgeCache>,
}

impl ContentFetcher {
    pub fn new(forge: Arc<dyn ForgeApi>, cache: Arc<ForgeCache>) -> Self {
        Self { forge, cache }
    }

    /// Returns the decoded content of `path` at `commit`.
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - the path does not exist at this commit
    /// * `Error::FileTooLarge` - the forge does not serve the file inline
    /// * `Error::Decode` - the payload is not valid base64
    /// * upstream failures as mapped from the forge client
    #[instrument(skip(self), fields(repo = %repo.full_name(), commit = %commit))]
    pub async fn file_content(
        &self,
        repo: &RepoRef,
        path: &str,
        commit: &CommitRef,
    ) -> FlattenResult<Arc<FileContent>> {
        let key = ContentKey::new(repo.owner(), repo.repo(), path, commit.as_str());
        self.cache
            .contents
            .get_or_try_insert_with(key, || async {
                let payload = self
                    .forge
                    .get_contents(repo.owner(), repo.repo(), path, commit.as_str())
                    .await?;
                let content = decode_payload(path, &payload)?;
                debug!(
                    size = content.size,
                    is_binary = content.is_binary,
                    "Fetched file content"
                );
                Ok::<_, Error>(Arc::new(content))
            })
            .await
    }
}

/// Decodes a contents API payload into [`FileContent`].
pub(crate) fn decode_payload(path: &str, payload: &FileContents) -> FlattenResult<FileContent> {
    if payload.encoding.as_deref() == Some("none") {
        return Err(Error::FileTooLarge {
            path: path.to_string(),
            size: payload.size,
        });
    }
    if !payload.has_inline_content() {
        return Err(Error::Decode {
            path: path.to_string(),
            message: format!(
                "no inline content (encoding: {})",
                payload.encoding.as_deref().unwrap_or("missing")
            ),
        });
    }

    // The API wraps base64 payloads at 60 columns.
    let encoded: String = payload
        .content
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD.decode(encoded.as_bytes()).map_err(|e| Error::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    Ok(FileContent::from_bytes(path, bytes))
}
