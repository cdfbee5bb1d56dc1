use crate::error::Result;
use crate::store::{Document, DocumentStore};
use tracing::debug;

/// Moves a document into the location named after its validated label,
/// creating the location first when needed. Returns the new identifier.
///
/// The caller must have validated `target_label` against the candidate set;
/// no re-validation happens here. A document already inside the target
/// location is a fast success.
pub async fn relocate(
    store: &dyn DocumentStore,
    document: &Document,
    target_label: &str,
) -> Result<String> {
    if document.location == target_label {
        debug!(
            "Document '{}' already in '{}', nothing to move",
            document.identifier(),
            target_label
        );
        return Ok(document.identifier());
    }

    if !store.location_exists(target_label).await? {
        store.create_location(target_label).await?;
    }

    let destination = format!("{}/{}", target_label, document.name);
    store.move_document(document, &destination).await?;
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SortError;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_relocate_creates_missing_location() {
        let store = MemoryStore::new();
        store.insert_document("", "note.md", "body");

        let doc = Document::new("note.md", "");
        let destination = relocate(&store, &doc, "Work").await.unwrap();

        assert_eq!(destination, "Work/note.md");
        assert!(store.location_exists("Work").await.unwrap());
        assert!(store.contains("Work/note.md"));
    }

    #[tokio::test]
    async fn test_relocate_reuses_existing_location() {
        let store = MemoryStore::new();
        store.add_location("Work");
        store.insert_document("", "note.md", "body");

        let doc = Document::new("note.md", "");
        relocate(&store, &doc, "Work").await.unwrap();

        assert_eq!(store.location_count(), 1);
    }

    #[tokio::test]
    async fn test_relocate_is_fast_success_when_already_in_place() {
        let store = MemoryStore::new();
        store.insert_document("Work", "note.md", "body");

        let doc = Document::new("note.md", "Work");
        let destination = relocate(&store, &doc, "Work").await.unwrap();

        assert_eq!(destination, "Work/note.md");
        assert!(store.contains("Work/note.md"));
    }

    #[tokio::test]
    async fn test_relocate_surfaces_collision_as_move_error() {
        let store = MemoryStore::new();
        store.insert_document("", "note.md", "body");
        store.insert_document("Work", "note.md", "occupied");

        let doc = Document::new("note.md", "");
        let err = relocate(&store, &doc, "Work").await.unwrap_err();
        assert!(matches!(err, SortError::Move { .. }));
    }
}
