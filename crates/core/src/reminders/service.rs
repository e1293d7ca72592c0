//! Reminder workflow orchestrator - core business logic
//!
//! Coordinates the normalizer, the calendar gateway, and the reminder store
//! for every save/edit/delete request. Ordering is load-bearing: the
//! calendar event is attempted before the database write on save paths, so
//! a stored row always means the user's data is safe even when the calendar
//! call failed.

use std::sync::Arc;

use chrono::NaiveDateTime;
use memora_domain::constants::{CHAT_LEAD_MINUTES, MANUAL_LEAD_MINUTES};
use memora_domain::{
    normalize, ManualReminderInput, MemoraError, NewReminder, Reminder, ReminderDraft,
    ReminderPatch, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ports::{CalendarGateway, ReminderRepository};

/// How the calendar sync side of a save request ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalendarSyncOutcome {
    /// An event was created during this request
    Synced {
        /// External event id now recorded on the reminder
        event_id: String,
    },
    /// The reminder already carried an event id; no API call was made
    AlreadySynced {
        /// Previously recorded external event id
        event_id: String,
    },
    /// The event could not be created; the reminder was stored anyway
    Unsynced {
        /// Non-fatal warning to surface to the user
        warning: String,
    },
}

/// Result of a save request: the stored reminder plus the sync outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedReminder {
    pub reminder: Reminder,
    pub sync: CalendarSyncOutcome,
}

/// Reminder workflow orchestrator
pub struct ReminderService {
    repository: Arc<dyn ReminderRepository>,
    calendar: Arc<dyn CalendarGateway>,
}

impl ReminderService {
    /// Create a new reminder service
    pub fn new(repository: Arc<dyn ReminderRepository>, calendar: Arc<dyn CalendarGateway>) -> Self {
        Self { repository, calendar }
    }

    /// Save a chat-detected reminder draft that the user has confirmed.
    ///
    /// Normalizes the draft against `now`, attempts the calendar event,
    /// then persists. `AuthRequired` from the gateway aborts before any
    /// database write - the user can reconnect and confirm the draft again.
    /// Any other sync failure is downgraded to a warning and the reminder
    /// is stored without an event id.
    pub async fn save_from_chat(
        &self,
        owner_id: &str,
        draft: &ReminderDraft,
        now: NaiveDateTime,
    ) -> Result<SavedReminder> {
        let title = validated_title(&draft.title)?;

        debug!(owner_id, "normalizing chat reminder draft");
        let schedule = normalize(draft, now)?;

        let fields = NewReminder {
            title,
            description: draft.description.clone(),
            date: schedule.date,
            time: schedule.time,
            lead_minutes: CHAT_LEAD_MINUTES,
            calendar_event_id: None,
        };

        self.sync_then_persist(owner_id, fields).await
    }

    /// Save a reminder filled in manually through the form.
    ///
    /// Same ordering as the chat path; the lead defaults to 10 minutes when
    /// the form leaves it unset.
    pub async fn save_manual(
        &self,
        owner_id: &str,
        input: ManualReminderInput,
    ) -> Result<SavedReminder> {
        let title = validated_title(&input.title)?;

        let fields = NewReminder {
            title,
            description: input.description,
            date: input.date,
            time: input.time,
            lead_minutes: input.lead_minutes.unwrap_or(MANUAL_LEAD_MINUTES),
            calendar_event_id: None,
        };

        self.sync_then_persist(owner_id, fields).await
    }

    /// Apply a partial edit to a stored reminder.
    ///
    /// The external calendar event is left untouched: once set, the event
    /// id is authoritative and the stored reminder is the source of truth.
    pub async fn edit(&self, owner_id: &str, id: &str, patch: ReminderPatch) -> Result<Reminder> {
        if patch.is_empty() {
            return self.repository.get(owner_id, id).await;
        }
        self.repository.update(owner_id, id, patch).await
    }

    /// Delete a stored reminder.
    ///
    /// The external calendar event is intentionally left in place; deleting
    /// a nonexistent id reports `NotFound`.
    pub async fn remove(&self, owner_id: &str, id: &str) -> Result<()> {
        self.repository.delete(owner_id, id).await
    }

    /// List reminders at or after `now`, ascending by instant.
    pub async fn list_upcoming(&self, owner_id: &str, now: NaiveDateTime) -> Result<Vec<Reminder>> {
        self.repository.list_upcoming(owner_id, now).await
    }

    /// Create the calendar event for a reminder stored without one.
    ///
    /// The duplicate-sync guard lives here: a reminder that already carries
    /// an event id returns `AlreadySynced` without any API call. Gateway
    /// failures propagate plainly - this path runs on an explicit user
    /// action, so there is nothing to downgrade.
    pub async fn sync_to_calendar(&self, owner_id: &str, id: &str) -> Result<SavedReminder> {
        let reminder = self.repository.get(owner_id, id).await?;

        if let Some(event_id) = reminder.calendar_event_id.clone() {
            debug!(owner_id, reminder_id = %reminder.id, "reminder already synced; skipping");
            return Ok(SavedReminder {
                reminder,
                sync: CalendarSyncOutcome::AlreadySynced { event_id },
            });
        }

        let fields = NewReminder {
            title: reminder.title.clone(),
            description: reminder.description.clone(),
            date: reminder.date,
            time: reminder.time,
            lead_minutes: reminder.lead_minutes,
            calendar_event_id: None,
        };

        let event_id = self.calendar.create_event(owner_id, &fields).await?;
        let reminder = self.repository.set_calendar_event_id(owner_id, id, &event_id).await?;

        info!(owner_id, reminder_id = %reminder.id, event_id, "reminder synced to calendar");

        Ok(SavedReminder { reminder, sync: CalendarSyncOutcome::Synced { event_id } })
    }

    /// Shared save pipeline: calendar event first, database write second.
    async fn sync_then_persist(
        &self,
        owner_id: &str,
        mut fields: NewReminder,
    ) -> Result<SavedReminder> {
        debug!(owner_id, title = %fields.title, "creating calendar event before persistence");

        let sync = match self.calendar.create_event(owner_id, &fields).await {
            Ok(event_id) => {
                fields.calendar_event_id = Some(event_id.clone());
                CalendarSyncOutcome::Synced { event_id }
            }
            Err(MemoraError::AuthRequired(message)) => {
                // Recoverable by user action; nothing was written anywhere.
                warn!(owner_id, "calendar authorization required; save aborted");
                return Err(MemoraError::AuthRequired(message));
            }
            Err(err) => {
                // Losing the user's note would be worse than a missing
                // calendar entry.
                warn!(owner_id, error = %err, "calendar sync failed; persisting reminder anyway");
                CalendarSyncOutcome::Unsynced { warning: err.to_string() }
            }
        };

        let reminder = self.repository.create(owner_id, fields).await?;

        info!(
            owner_id,
            reminder_id = %reminder.id,
            synced = reminder.calendar_event_id.is_some(),
            "reminder saved"
        );

        Ok(SavedReminder { reminder, sync })
    }
}

fn validated_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(MemoraError::Validation("reminder title must not be empty".into()));
    }
    Ok(title.to_string())
}
