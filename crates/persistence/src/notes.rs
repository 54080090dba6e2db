//! Note persistence

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::PersistenceError;

/// Free-text note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// Note store trait
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, content: &str) -> Result<Note, PersistenceError>;

    /// All notes in creation order
    async fn list(&self) -> Result<Vec<Note>, PersistenceError>;
}

/// In-memory note store (default)
#[derive(Default)]
pub struct InMemoryNoteStore {
    notes: RwLock<Vec<Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn create(&self, content: &str) -> Result<Note, PersistenceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(PersistenceError::InvalidData("note content is empty".to_string()));
        }

        let mut notes = self.notes.write();
        let note = Note {
            id: notes.len() as u64 + 1,
            content: content.to_string(),
            created_at: Local::now().naive_local(),
        };
        notes.push(note.clone());

        tracing::info!(note_id = note.id, "Note stored");
        Ok(note)
    }

    async fn list(&self) -> Result<Vec<Note>, PersistenceError> {
        Ok(self.notes.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list() {
        let store = InMemoryNoteStore::new();
        let first = store.create("  mua sữa  ").await.unwrap();
        let second = store.create("gọi thợ sửa điện").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(first.content, "mua sữa");
        assert_eq!(second.id, 2);

        let notes = store.list().await.unwrap();
        assert_eq!(notes, vec![first, second]);
    }

    #[tokio::test]
    async fn test_empty_note_rejected() {
        let store = InMemoryNoteStore::new();
        assert!(matches!(
            store.create("").await,
            Err(PersistenceError::InvalidData(_))
        ));
    }
}
