//! Reminder persistence

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::PersistenceError;

/// Scheduled reminder
///
/// Times are local wall-clock values, matching what the user said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u64,
    pub remind_at: NaiveDateTime,
    pub description: String,
    pub notified: bool,
    pub created_at: NaiveDateTime,
}

impl Reminder {
    /// Due once `remind_at` has passed and it has not fired yet
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        !self.notified && self.remind_at <= now
    }
}

/// Reminder store trait
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Store a new reminder and return it with its assigned id
    async fn create(
        &self,
        remind_at: NaiveDateTime,
        description: &str,
    ) -> Result<Reminder, PersistenceError>;

    async fn get(&self, id: u64) -> Result<Option<Reminder>, PersistenceError>;

    /// All reminders in creation order
    async fn list(&self) -> Result<Vec<Reminder>, PersistenceError>;

    /// Unnotified reminders with `remind_at <= now`
    async fn due(&self, now: NaiveDateTime) -> Result<Vec<Reminder>, PersistenceError>;

    /// Set the notified flag; `false` when no reminder has this id
    async fn mark_notified(&self, id: u64) -> Result<bool, PersistenceError>;
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    reminders: BTreeMap<u64, Reminder>,
}

/// In-memory reminder store (default)
///
/// Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryReminderStore {
    inner: RwLock<Inner>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn create(
        &self,
        remind_at: NaiveDateTime,
        description: &str,
    ) -> Result<Reminder, PersistenceError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PersistenceError::InvalidData(
                "reminder description is empty".to_string(),
            ));
        }

        let mut inner = self.inner.write();
        inner.next_id += 1;
        let reminder = Reminder {
            id: inner.next_id,
            remind_at,
            description: description.to_string(),
            notified: false,
            created_at: Local::now().naive_local(),
        };
        inner.reminders.insert(reminder.id, reminder.clone());

        tracing::info!(
            reminder_id = reminder.id,
            remind_at = %reminder.remind_at,
            "Reminder stored"
        );

        Ok(reminder)
    }

    async fn get(&self, id: u64) -> Result<Option<Reminder>, PersistenceError> {
        Ok(self.inner.read().reminders.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Reminder>, PersistenceError> {
        Ok(self.inner.read().reminders.values().cloned().collect())
    }

    async fn due(&self, now: NaiveDateTime) -> Result<Vec<Reminder>, PersistenceError> {
        Ok(self
            .inner
            .read()
            .reminders
            .values()
            .filter(|r| r.is_due(now))
            .cloned()
            .collect())
    }

    async fn mark_notified(&self, id: u64) -> Result<bool, PersistenceError> {
        match self.inner.write().reminders.get_mut(&id) {
            Some(reminder) => {
                reminder.notified = true;
                tracing::debug!(reminder_id = id, "Reminder marked notified");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
