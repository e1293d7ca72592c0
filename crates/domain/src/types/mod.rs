//! Domain types and models

pub mod intent;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// Re-export intent types for convenience
pub use intent::{IntentExtraction, Language, ReminderDraft};

/// A user-scoped reminder (appointment) record.
///
/// `date` and `time` combine into a single absolute instant; only the
/// normalizer derives them from relative day words. `calendar_event_id`
/// absent means "not yet synced" to the external calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Opaque unique identifier, assigned by the store on creation
    pub id: String,
    /// Identifier of the owning user; immutable after creation
    pub owner_id: String,
    /// Non-empty short text
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Calendar date of the reminder instant
    pub date: NaiveDate,
    /// Time of day of the reminder instant (seconds always zero)
    pub time: NaiveTime,
    /// Minutes before the instant at which the notification fires
    pub lead_minutes: u32,
    /// External calendar event id, set at most once per successful sync
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event_id: Option<String>,
    /// Epoch seconds, set by the store
    pub created_at: i64,
    /// Epoch seconds, set by the store
    pub updated_at: i64,
}

impl Reminder {
    /// The absolute instant this reminder refers to. Interpreted in the
    /// caller's local timezone context; no conversion is performed.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Fields for creating a reminder. The store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReminder {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub lead_minutes: u32,
    /// Present when the calendar event was created before the row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event_id: Option<String>,
}

impl NewReminder {
    /// The absolute instant of the reminder being created.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Partial update for a reminder. `None` fields retain their prior value;
/// `owner_id`, timestamps, and the calendar event id are never patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_minutes: Option<u32>,
}

impl ReminderPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.lead_minutes.is_none()
    }
}

/// Input for the manual reminder form. Unlike a chat draft, date and time
/// are already absolute; the lead defaults to 10 minutes when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualReminderInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_minutes: Option<u32>,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Stable string form used for storage and API payloads
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse the stored string form back into a role.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// A persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub owner_id: String,
    pub role: ChatRole,
    pub content: String,
    /// Epoch seconds, set by the store
    pub created_at: i64,
}

/// Current user identity plus the OAuth token scoped to the calendar API.
///
/// Supplied by the external session provider; the token is optional because
/// a signed-in user may not have connected their calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_access_token: Option<String>,
}
