//! Session state file.
//!
//! The whole session is stored as one export document, the same JSON a
//! user exports by hand.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nexus_domain::ExportDocument;
use tokio::fs;
use tracing::{debug, info};

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Error type for state file operations.
#[derive(Debug, thiserror::Error)]
pub enum StateFileError {
    /// IO error during file operations.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Invalid state file {path}: {source}")]
    Serialization {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: SerializationError,
    },
}

/// Reads and writes the export document at a fixed path.
#[derive(Debug, Clone)]
pub struct StateFileRepository {
    path: PathBuf,
}

impl StateFileRepository {
    /// Creates a repository for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document.
    ///
    /// Returns an empty document if the file doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid document.
    pub async fn load(&self) -> Result<ExportDocument, StateFileError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file, starting empty");
                return Ok(ExportDocument::default());
            }
            Err(source) => {
                return Err(StateFileError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        from_json_bytes(&content).map_err(|source| StateFileError::Serialization {
            path: self.path.clone(),
            source,
        })
    }

    /// Saves the document, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    pub async fn save(&self, document: &ExportDocument) -> Result<(), StateFileError> {
        let io_error = |source: std::io::Error| StateFileError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let content =
            to_json_stable_bytes(document).map_err(|source| StateFileError::Serialization {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, content).await.map_err(io_error)?;

        info!(
            path = %self.path.display(),
            requests = document.requests.len(),
            "state saved"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_returns_empty_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = StateFileRepository::new(dir.path().join("missing.json"));
        let document = repo.load().await.unwrap();
        assert!(document.requests.is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        let result = StateFileRepository::new(&path).load().await;
        assert!(matches!(result, Err(StateFileError::Serialization { .. })));
    }
}
