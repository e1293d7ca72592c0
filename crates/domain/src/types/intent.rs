//! Intent extraction types
//!
//! Transient results produced by the conversational intent extractor. These
//! are never persisted: a draft becomes a reminder only after the user
//! confirms it and the workflow's save path runs.

use serde::{Deserialize, Serialize};

/// Language the assistant replies in. The extractor produces day words in
/// either language, which the normalizer accepts interchangeably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Th,
}

impl Language {
    /// Reply shown when the extractor call fails and the raw text must be
    /// treated as a plain, non-reminder exchange.
    pub fn fallback_reply(self) -> &'static str {
        match self {
            Self::En => "Sorry, an error occurred. Please try again.",
            Self::Th => "ขออภัยครับ เกิดข้อผิดพลาด กรุณาลองอีกครั้ง",
        }
    }
}

/// Structured reminder proposal extracted from free text.
///
/// `time_of_day` and `relative_day` stay loosely typed here — they are
/// whatever the extractor produced ("18:00", "tomorrow", "พรุ่งนี้"). The
/// normalizer is the only component that turns them into an instant, and it
/// rejects anything malformed instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expected "HH:mm"
    pub time_of_day: String,
    /// Relative day word: today / tomorrow / day after tomorrow, English or
    /// Thai
    pub relative_day: String,
}

/// Result of one extractor call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentExtraction {
    /// Text to show the user
    pub reply_text: String,
    /// Present only when the message carried a reminder intent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<ReminderDraft>,
}

impl IntentExtraction {
    /// Plain reply with no reminder attached.
    pub fn plain(reply_text: impl Into<String>) -> Self {
        Self { reply_text: reply_text.into(), reminder: None }
    }

    /// Whether the extractor classified the message as reminder-bearing.
    pub fn is_reminder_intent(&self) -> bool {
        self.reminder.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_extraction_has_no_intent() {
        let extraction = IntentExtraction::plain("hello");
        assert!(!extraction.is_reminder_intent());
        assert_eq!(extraction.reply_text, "hello");
    }

    #[test]
    fn draft_deserializes_from_extractor_payload() {
        let json = r#"{
            "title": "Meeting with Mom",
            "description": "Meeting with mom tomorrow at 6 PM",
            "time_of_day": "18:00",
            "relative_day": "tomorrow"
        }"#;

        let draft: ReminderDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.time_of_day, "18:00");
        assert_eq!(draft.relative_day, "tomorrow");
    }

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Th).unwrap(), "\"th\"");
    }
}
