//! Filesystem note source rooted at a vault folder.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::infrastructure::ports::{ImportError, NoteFile, NoteSource};

/// Reads markdown notes straight from disk.
pub struct FsNoteSource {
    vault_root: PathBuf,
}

impl FsNoteSource {
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        Self {
            vault_root: vault_root.into(),
        }
    }

    /// Resolve a vault-relative folder, refusing anything that escapes the vault.
    fn resolve(&self, folder: &str) -> Result<PathBuf, ImportError> {
        let relative = Path::new(folder.trim().trim_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ImportError::InvalidFolder(relative.to_path_buf()));
        }
        Ok(self.vault_root.join(relative))
    }
}

#[async_trait]
impl NoteSource for FsNoteSource {
    async fn list_notes(&self, folder: &str) -> Result<Vec<NoteFile>, ImportError> {
        let dir = self.resolve(folder)?;
        if !fs::metadata(&dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(ImportError::InvalidFolder(dir));
        }

        let prefix = folder.trim().trim_matches('/');
        let mut notes = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                file_name
            } else {
                format!("{}/{}", prefix, file_name)
            };

            let content = match fs::read_to_string(&path).await {
                Ok(content) => Some(content),
                Err(e) => {
                    tracing::debug!(path = %relative, error = %e, "Could not read note");
                    None
                }
            };
            notes.push(NoteFile::new(relative, name, content));
        }

        notes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(notes)
    }
}
