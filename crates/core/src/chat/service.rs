//! Chat service - persists the conversation and runs intent extraction
//!
//! One user message flows through here as a single sequential chain: store
//! the message, replay recent history to the extractor, store the reply.
//! An extractor failure never fails the exchange - the user gets a
//! per-language fallback reply and no draft, matching the contract that the
//! caller treats raw text as a non-reminder reply when extraction is
//! unavailable.

use std::sync::Arc;

use memora_domain::constants::CHAT_HISTORY_LIMIT;
use memora_domain::{
    ChatMessage, ChatRole, IntentExtraction, Language, MemoraError, ReminderDraft, Result,
};
use tracing::{debug, warn};

use super::ports::{ChatMessageRepository, IntentExtractor};

/// Outcome of one chat exchange.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The stored assistant reply
    pub reply: ChatMessage,
    /// Draft proposed by the extractor, awaiting user confirmation
    pub reminder_draft: Option<ReminderDraft>,
}

/// Conversational service
pub struct ChatService {
    messages: Arc<dyn ChatMessageRepository>,
    extractor: Arc<dyn IntentExtractor>,
    history_limit: usize,
}

impl ChatService {
    /// Create a new chat service with the default history window.
    pub fn new(messages: Arc<dyn ChatMessageRepository>, extractor: Arc<dyn IntentExtractor>) -> Self {
        Self { messages, extractor, history_limit: CHAT_HISTORY_LIMIT }
    }

    /// Override how many prior messages are replayed to the extractor.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Process one user message and return the assistant's turn.
    ///
    /// The history snapshot is taken before the new message is stored, so
    /// the extractor sees the conversation exactly as the user did when
    /// they typed.
    pub async fn handle_message(
        &self,
        owner_id: &str,
        text: &str,
        language: Language,
    ) -> Result<ChatTurn> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(MemoraError::Validation("chat message must not be empty".into()));
        }

        let history = self.messages.recent_messages(owner_id, self.history_limit).await?;
        self.messages.save_message(owner_id, ChatRole::User, trimmed).await?;

        let extraction = match self.extractor.extract(trimmed, &history, language).await {
            Ok(extraction) => extraction,
            Err(err) => {
                warn!(owner_id, error = %err, "intent extraction failed; using fallback reply");
                IntentExtraction::plain(language.fallback_reply())
            }
        };

        debug!(
            owner_id,
            reminder_intent = extraction.is_reminder_intent(),
            "assistant reply produced"
        );

        let reply =
            self.messages.save_message(owner_id, ChatRole::Assistant, &extraction.reply_text).await?;

        Ok(ChatTurn { reply, reminder_draft: extraction.reminder })
    }
}
