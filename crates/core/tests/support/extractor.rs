//! Mock intent extractor for testing

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use memora_core::IntentExtractor;
use memora_domain::{
    ChatMessage, IntentExtraction, Language, MemoraError, Result as DomainResult,
};

/// Arguments captured from the last `extract` call.
#[derive(Debug, Clone)]
pub struct CapturedExtract {
    pub message: String,
    pub history: Vec<ChatMessage>,
    pub language: Language,
}

/// Scriptable in-memory `IntentExtractor`.
pub struct MockIntentExtractor {
    outcome: Mutex<Option<IntentExtraction>>,
    captured: Mutex<Option<CapturedExtract>>,
}

impl MockIntentExtractor {
    /// Extractor that returns the given extraction on every call.
    pub fn returning(extraction: IntentExtraction) -> Arc<Self> {
        Arc::new(Self { outcome: Mutex::new(Some(extraction)), captured: Mutex::new(None) })
    }

    /// Extractor that fails on every call.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self { outcome: Mutex::new(None), captured: Mutex::new(None) })
    }

    pub fn last_call(&self) -> Option<CapturedExtract> {
        self.captured.lock().unwrap().clone()
    }

    pub fn was_called(&self) -> bool {
        self.captured.lock().unwrap().is_some()
    }
}

#[async_trait]
impl IntentExtractor for MockIntentExtractor {
    async fn extract(
        &self,
        message: &str,
        history: &[ChatMessage],
        language: Language,
    ) -> DomainResult<IntentExtraction> {
        *self.captured.lock().unwrap() = Some(CapturedExtract {
            message: message.to_string(),
            history: history.to_vec(),
            language,
        });

        self.outcome
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| MemoraError::Network("extractor unavailable".into()))
    }
}
