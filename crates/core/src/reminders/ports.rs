//! Port interfaces for the reminder workflow

use async_trait::async_trait;
use chrono::NaiveDateTime;
use memora_domain::{NewReminder, Reminder, ReminderPatch, Result, Session};

/// Trait for persisting reminder records.
///
/// Every operation is scoped to `owner_id`; implementations must include an
/// equality filter on the owner column in every statement so cross-tenant
/// access is impossible by construction.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Insert a reminder atomically and return the stored record.
    async fn create(&self, owner_id: &str, fields: NewReminder) -> Result<Reminder>;

    /// Fetch a single reminder owned by `owner_id`.
    ///
    /// Returns `NotFound` when the id does not exist or belongs to another
    /// owner.
    async fn get(&self, owner_id: &str, id: &str) -> Result<Reminder>;

    /// List reminders whose instant is at or after `now`, ascending by
    /// instant. Pure read; restartable.
    async fn list_upcoming(&self, owner_id: &str, now: NaiveDateTime) -> Result<Vec<Reminder>>;

    /// Apply a partial update. Unspecified fields retain their prior value.
    async fn update(&self, owner_id: &str, id: &str, patch: ReminderPatch) -> Result<Reminder>;

    /// Delete a reminder. Deleting a nonexistent id is `NotFound`, not a
    /// no-op.
    async fn delete(&self, owner_id: &str, id: &str) -> Result<()>;

    /// Record the external event id after a successful sync. The column is
    /// written at most once; a second write is an error.
    async fn set_calendar_event_id(
        &self,
        owner_id: &str,
        id: &str,
        event_id: &str,
    ) -> Result<Reminder>;
}

/// Trait for the external calendar integration.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Probe the calendar API with the current session token.
    ///
    /// Never errors: a missing token, a permissions failure, or any
    /// transport problem all report `false`. Only an authorized 2xx
    /// response reports `true`.
    async fn check_connection(&self, owner_id: &str) -> bool;

    /// Create an event for the reminder and return the external event id.
    ///
    /// Fails with `AuthRequired` when no provider token is present (before
    /// any network call) and `ExternalApi` for other non-2xx responses.
    /// Exactly one attempt; retry policy belongs to the orchestrator.
    async fn create_event(&self, owner_id: &str, reminder: &NewReminder) -> Result<String>;
}

/// Trait for the session/identity provider.
///
/// The provider itself is an external collaborator; this port exposes the
/// contract the workflow consumes: who is signed in and whether a calendar
/// provider token is available.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when signed out.
    async fn current_session(&self) -> Option<Session>;
}
