//! Storage layer for the Ruby assistant
//!
//! Provides storage for:
//! - Reminders (appointments) with a notified flag, polled by the server
//! - Free-text notes
//!
//! Stores sit behind async traits so a database backend can replace the
//! in-memory implementations without touching callers.

pub mod error;
pub mod notes;
pub mod reminders;

pub use error::PersistenceError;
pub use notes::{InMemoryNoteStore, Note, NoteStore};
pub use reminders::{InMemoryReminderStore, Reminder, ReminderStore};

use std::sync::Arc;

/// Combined persistence layer with all stores
#[derive(Clone)]
pub struct PersistenceLayer {
    pub reminders: Arc<dyn ReminderStore>,
    pub notes: Arc<dyn NoteStore>,
}

impl PersistenceLayer {
    /// Process-local stores; contents are lost on restart
    pub fn in_memory() -> Self {
        tracing::info!("Using in-memory reminder and note stores");
        Self {
            reminders: Arc::new(InMemoryReminderStore::new()),
            notes: Arc::new(InMemoryNoteStore::new()),
        }
    }
}
