//! Google Calendar integration
//!
//! Implements the `CalendarGateway` port: event creation for reminders and
//! the lightweight connectivity probe. Token acquisition goes through the
//! session provider on every call; there is no token cache here.

mod client;
mod types;

pub use client::GoogleCalendarGateway;
pub use types::{EventDateTime, EventPayload, EventReminderOverride, EventReminders};
