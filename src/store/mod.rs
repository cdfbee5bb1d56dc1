pub mod fs;

use crate::error::{Result, SortError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A unit of text content with a base name and its current container.
///
/// The identifier is `location/name`; an empty location means the document
/// sits at the top level of the store. Classification never mutates a
/// document, only relocation does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub location: String,
}

impl Document {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Store-relative identifier, `location/name` or just `name` at top level.
    pub fn identifier(&self) -> String {
        if self.location.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.location, self.name)
        }
    }
}

/// Host document store the sorter reads from and moves documents within.
///
/// Locations are flat, top-level containers named after category labels.
/// Implementations surface their own failures as `Read`/`Move` errors.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists documents in the given scope; empty scope means top level only.
    async fn list_documents(&self, scope: &str) -> Result<Vec<Document>>;

    async fn read_content(&self, document: &Document) -> Result<String>;

    /// Names of the top-level containers, used for label auto-detection.
    async fn list_locations(&self) -> Result<Vec<String>>;

    async fn location_exists(&self, name: &str) -> Result<bool>;

    /// Creates a location; creating an existing location is a no-op.
    async fn create_location(&self, name: &str) -> Result<()>;

    /// Moves a document to `new_identifier` (`location/name`). Fails with a
    /// `Move` error when the destination identifier is already taken.
    async fn move_document(&self, document: &Document, new_identifier: &str) -> Result<()>;
}

/// Splits a store identifier into (location, name) at the last separator.
pub(crate) fn split_identifier(identifier: &str) -> (&str, &str) {
    match identifier.rsplit_once('/') {
        Some((location, name)) => (location, name),
        None => ("", identifier),
    }
}

#[derive(Debug, Clone)]
struct StoredDocument {
    document: Document,
    content: String,
}

#[derive(Debug, Default)]
struct MemoryInner {
    documents: Vec<StoredDocument>,
    locations: BTreeSet<String>,
}

/// Map-backed store for tests and embedders that manage content themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_document(
        &self,
        location: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) {
        let location = location.into();
        let mut inner = self.inner.lock();
        if !location.is_empty() {
            inner.locations.insert(location.clone());
        }
        inner.documents.push(StoredDocument {
            document: Document::new(name, location),
            content: content.into(),
        });
    }

    pub fn add_location(&self, name: impl Into<String>) {
        self.inner.lock().locations.insert(name.into());
    }

    /// Current location of the named document, if present.
    pub fn location_of(&self, name: &str) -> Option<String> {
        self.inner
            .lock()
            .documents
            .iter()
            .find(|stored| stored.document.name == name)
            .map(|stored| stored.document.location.clone())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        let (location, name) = split_identifier(identifier);
        self.inner
            .lock()
            .documents
            .iter()
            .any(|stored| stored.document.location == location && stored.document.name == name)
    }

    pub fn location_count(&self) -> usize {
        self.inner.lock().locations.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, scope: &str) -> Result<Vec<Document>> {
        let inner = self.inner.lock();
        Ok(inner
            .documents
            .iter()
            .filter(|stored| stored.document.location == scope)
            .map(|stored| stored.document.clone())
            .collect())
    }

    async fn read_content(&self, document: &Document) -> Result<String> {
        let inner = self.inner.lock();
        inner
            .documents
            .iter()
            .find(|stored| stored.document == *document)
            .map(|stored| stored.content.clone())
            .ok_or_else(|| SortError::Read {
                path: document.identifier(),
                message: "document not found".to_string(),
            })
    }

    async fn list_locations(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().locations.iter().cloned().collect())
    }

    async fn location_exists(&self, name: &str) -> Result<bool> {
        Ok(self.inner.lock().locations.contains(name))
    }

    async fn create_location(&self, name: &str) -> Result<()> {
        self.inner.lock().locations.insert(name.to_string());
        Ok(())
    }

    async fn move_document(&self, document: &Document, new_identifier: &str) -> Result<()> {
        let (new_location, new_name) = split_identifier(new_identifier);
        let mut inner = self.inner.lock();

        let collision = inner.documents.iter().any(|stored| {
            stored.document.location == new_location && stored.document.name == new_name
        });
        if collision {
            return Err(SortError::Move {
                path: document.identifier(),
                message: format!("destination '{}' already exists", new_identifier),
            });
        }

        let stored = inner
            .documents
            .iter_mut()
            .find(|stored| stored.document == *document)
            .ok_or_else(|| SortError::Move {
                path: document.identifier(),
                message: "document not found".to_string(),
            })?;

        stored.document.location = new_location.to_string();
        stored.document.name = new_name.to_string();
        Ok(())
    }
}
