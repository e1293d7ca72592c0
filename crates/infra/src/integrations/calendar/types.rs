//! Calendar API payload types

use serde::{Deserialize, Serialize};

/// Event creation payload for the calendar API.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: EventReminders,
}

/// Timed boundary of an event: a naive local date-time plus the IANA
/// timezone label the provider should interpret it in.
#[derive(Debug, Clone, Serialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// Notification settings on the event. Provider defaults are always
/// disabled; exactly one explicit override is sent.
#[derive(Debug, Clone, Serialize)]
pub struct EventReminders {
    #[serde(rename = "useDefault")]
    pub use_default: bool,
    pub overrides: Vec<EventReminderOverride>,
}

/// One notification override.
#[derive(Debug, Clone, Serialize)]
pub struct EventReminderOverride {
    pub method: String,
    pub minutes: u32,
}

/// Created-event response; only the id is consumed.
#[derive(Debug, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
}
