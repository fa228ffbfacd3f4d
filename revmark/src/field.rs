//! Review-field gateway.
//!
//! The review page owns one free-text field (description, cover message) that
//! doubles as revmark's durable store. This module defines the boundary the
//! sync controller consumes — fetch the current text, replace it — and a
//! file-backed adapter used by the binary and the integration tests. The real
//! network client behind a live review system implements the same trait.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Errors crossing the gateway boundary.
///
/// Transport details stay on the adapter side; the controller only needs to
/// know which half of the read-modify-write cycle failed.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field fetch failed: {0}")]
    Fetch(String),

    #[error("field write rejected: {0}")]
    Write(String),
}

/// The one primitive pair revmark requires of its host page: current field
/// text, and replace field text.
///
/// Read-modify-write through this trait carries no transactional guarantee —
/// two overlapping persist cycles resolve as last-writer-wins.
#[async_trait]
pub trait ReviewField: Send + Sync {
    async fn fetch_text(&self) -> Result<String, FieldError>;
    async fn write_text(&self, text: &str) -> Result<(), FieldError>;
}

/// A local file standing in for the remote review field.
#[derive(Debug, Clone)]
pub struct FileField {
    path: PathBuf,
}

impl FileField {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReviewField for FileField {
    /// Reads the whole file. A file that does not exist yet is an empty
    /// field, not an error — a review whose field was never written has no
    /// text either.
    async fn fetch_text(&self) -> Result<String, FieldError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(FieldError::Fetch(err.to_string())),
        }
    }

    async fn write_text(&self, text: &str) -> Result<(), FieldError> {
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|err| FieldError::Write(err.to_string()))
    }
}
