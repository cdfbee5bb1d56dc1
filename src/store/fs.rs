use crate::error::{Result, SortError};
use crate::store::{split_identifier, Document, DocumentStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory-rooted document store.
///
/// Top-level subdirectories are the category locations; documents are plain
/// files. Listing never recurses past one level, matching the top-level-only
/// scope contract.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scope_dir(&self, scope: &str) -> PathBuf {
        if scope.is_empty() {
            self.root.clone()
        } else {
            self.root.join(scope)
        }
    }

    fn read_error(path: &Path, err: &std::io::Error) -> SortError {
        SortError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn list_documents(&self, scope: &str) -> Result<Vec<Document>> {
        let dir = self.scope_dir(scope);
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| Self::read_error(&dir, &e))?;

        let mut documents = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::read_error(&dir, &e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Self::read_error(&entry.path(), &e))?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            documents.push(Document::new(name, scope));
        }

        // Directory iteration order is platform-dependent; keep runs stable.
        documents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(documents)
    }

    async fn read_content(&self, document: &Document) -> Result<String> {
        let path = self.root.join(document.identifier());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Self::read_error(&path, &e))
    }

    async fn list_locations(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| Self::read_error(&self.root, &e))?;

        let mut locations = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::read_error(&self.root, &e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Self::read_error(&entry.path(), &e))?;
            if !file_type.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            locations.push(name);
        }

        locations.sort();
        Ok(locations)
    }

    async fn location_exists(&self, name: &str) -> Result<bool> {
        let path = self.root.join(name);
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn create_location(&self, name: &str) -> Result<()> {
        let path = self.root.join(name);
        // create_dir_all tolerates a pre-existing directory
        tokio::fs::create_dir_all(&path).await?;
        debug!("Ensured location exists: {}", path.display());
        Ok(())
    }

    async fn move_document(&self, document: &Document, new_identifier: &str) -> Result<()> {
        let source = self.root.join(document.identifier());
        let (new_location, _) = split_identifier(new_identifier);
        let destination = self.root.join(new_identifier);

        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            return Err(SortError::Move {
                path: document.identifier(),
                message: format!("destination '{}' already exists", new_identifier),
            });
        }

        if !new_location.is_empty() {
            let dir = self.root.join(new_location);
            if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
                return Err(SortError::Move {
                    path: document.identifier(),
                    message: format!("destination location '{}' does not exist", new_location),
                });
            }
        }

        tokio::fs::rename(&source, &destination)
            .await
            .map_err(|e| SortError::Move {
                path: document.identifier(),
                message: e.to_string(),
            })?;

        debug!(
            "Moved {} -> {}",
            source.display(),
            destination.display()
        );
        Ok(())
    }
}
