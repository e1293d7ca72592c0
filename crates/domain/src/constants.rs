//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Notification lead time applied when a reminder is filled in manually and
/// the user leaves the lead field unset.
pub const MANUAL_LEAD_MINUTES: u32 = 10;

/// Notification lead time applied to chat-detected reminder drafts.
pub const CHAT_LEAD_MINUTES: u32 = 30;

/// Fixed duration of the calendar event created for a reminder. One constant
/// everywhere; the event end is always start + this value.
pub const EVENT_DURATION_MINUTES: i64 = 30;

/// How many prior messages are replayed to the intent extractor.
pub const CHAT_HISTORY_LIMIT: usize = 10;

/// Notification delivery method requested on the calendar event override.
pub const EVENT_REMINDER_METHOD: &str = "popup";
