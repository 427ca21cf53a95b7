//! Note source port: where spell and bonus notes come from.

use async_trait::async_trait;

use super::error::ImportError;

/// One markdown note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    /// Vault-relative path, used as the note's source identity
    pub path: String,
    /// File name without extension
    pub name: String,
    /// `None` when the note could not be read
    pub content: Option<String>,
}

impl NoteFile {
    pub fn new(path: impl Into<String>, name: impl Into<String>, content: Option<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            content,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Notes directly inside `folder` (not recursive).
    async fn list_notes(&self, folder: &str) -> Result<Vec<NoteFile>, ImportError>;
}
