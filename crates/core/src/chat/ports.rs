//! Port interfaces for the conversational flow

use async_trait::async_trait;
use memora_domain::{ChatMessage, ChatRole, IntentExtraction, Language, Result};

/// Trait for persisting chat messages, scoped by owner.
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Store one message and return the stored record.
    async fn save_message(
        &self,
        owner_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage>;

    /// The most recent `limit` messages for the owner, oldest first.
    async fn recent_messages(&self, owner_id: &str, limit: usize) -> Result<Vec<ChatMessage>>;
}

/// Trait for the conversational intent extractor.
///
/// Given the user's message and recent history, produces a reply and, when
/// the text carries a reminder intent, a structured draft. The extractor
/// only proposes; it never creates reminders.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Extract a reply (and possibly a reminder draft) from free text.
    async fn extract(
        &self,
        message: &str,
        history: &[ChatMessage],
        language: Language,
    ) -> Result<IntentExtraction>;
}
