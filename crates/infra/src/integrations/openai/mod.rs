//! OpenAI-backed intent extractor
//!
//! Implements the `IntentExtractor` port with a chat-completions call that
//! returns a structured verdict: the assistant's reply plus, when the text
//! carries a reminder intent, a draft for the user to confirm.

mod client;
mod prompts;
mod types;

pub use client::OpenAiIntentExtractor;
pub use types::ExtractorVerdict;
