//! Reminder draft normalizer.
//!
//! Converts the loosely structured day/time fields the intent extractor
//! produces into an absolute date and time. This is the only component
//! allowed to interpret relative day words; everything downstream works
//! with the derived instant.
//!
//! The extractor emits day words in English or Thai depending on the
//! conversation language, so both lexicons are accepted interchangeably.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::{MemoraError, Result};
use crate::types::ReminderDraft;

/// Absolute schedule derived from a reminder draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSchedule {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl NormalizedSchedule {
    /// The combined instant, interpreted in the caller's local timezone
    /// context. No conversion is performed.
    pub fn instant(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Normalize a reminder draft against a reference instant.
///
/// The date starts from `reference_now`'s calendar date and advances 0, 1,
/// or 2 days according to the draft's relative day word; the time comes
/// from the draft's `HH:mm` field with seconds truncated to zero.
///
/// # Errors
/// Returns [`MemoraError::Validation`] when either field cannot be parsed.
/// A malformed time never silently defaults to midnight.
pub fn normalize(draft: &ReminderDraft, reference_now: NaiveDateTime) -> Result<NormalizedSchedule> {
    let offset = parse_relative_day(&draft.relative_day)?;
    let time = parse_time_of_day(&draft.time_of_day)?;

    let date = reference_now
        .date()
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| MemoraError::Validation("reminder date out of range".into()))?;

    Ok(NormalizedSchedule { date, time })
}

/// Parse a strict `HH:mm` time-of-day string.
///
/// Two digits, a colon, two digits; hour 00-23, minute 00-59. Seconds in
/// the result are always zero.
fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();

    let invalid =
        || MemoraError::Validation(format!("time of day '{value}' does not match HH:mm"));

    let (hour_part, minute_part) = trimmed.split_once(':').ok_or_else(invalid)?;
    if hour_part.len() != 2 || minute_part.len() != 2 {
        return Err(invalid());
    }
    if !hour_part.bytes().all(|b| b.is_ascii_digit())
        || !minute_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let hour: u32 = hour_part.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_part.parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Map a relative day word to its day offset.
///
/// Accepts English and Thai variants, case-insensitively, ignoring inner
/// whitespace and underscores ("Day After Tomorrow", "dayAfterTomorrow",
/// and "มะรืนนี้" all mean +2).
fn parse_relative_day(value: &str) -> Result<u64> {
    let folded: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();

    match folded.as_str() {
        "today" | "วันนี้" => Ok(0),
        "tomorrow" | "พรุ่งนี้" => Ok(1),
        "dayaftertomorrow" | "มะรืนนี้" => Ok(2),
        _ => Err(MemoraError::Validation(format!("unrecognized relative day '{value}'"))),
    }
}
