//! Background reminder poller
//!
//! Wakes on a fixed interval, logs every due reminder, and marks it notified
//! so it fires once.

use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use ruby_persistence::{PersistenceError, Reminder, ReminderStore};

use crate::metrics::record_reminder_fired;

/// Fire reminders due at `now`; returns them with `notified` set
pub async fn fire_due_reminders(
    store: &dyn ReminderStore,
    now: NaiveDateTime,
) -> Result<Vec<Reminder>, PersistenceError> {
    let mut due = store.due(now).await?;

    for reminder in &mut due {
        tracing::info!(
            reminder_id = reminder.id,
            remind_at = %reminder.remind_at,
            "Reminder due: {}",
            reminder.description
        );
        if store.mark_notified(reminder.id).await? {
            reminder.notified = true;
            record_reminder_fired();
        }
    }

    Ok(due)
}

/// Start the poller; send `true` on the returned channel to stop it
pub fn spawn_reminder_poller(
    store: Arc<dyn ReminderStore>,
    every: Duration,
) -> watch::Sender<bool> {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut timer = tokio::time::interval(every);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    match fire_due_reminders(store.as_ref(), Local::now().naive_local()).await {
                        Ok(fired) if !fired.is_empty() => {
                            tracing::debug!(count = fired.len(), "Reminders fired");
                        }
                        Ok(_) => {}
                        Err(e) => tracing::error!(error = %e, "Reminder poll failed"),
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Reminder poller shutting down");
                        break;
                    }
                }
            }
        }
    });

    tracing::info!(interval_secs = every.as_secs(), "Reminder poller started");
    shutdown_tx
}
