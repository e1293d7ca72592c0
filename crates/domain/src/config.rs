//! Configuration management

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database settings
    pub database: DatabaseConfig,
    /// Calendar integration settings
    pub calendar: CalendarConfig,
    /// Intent extractor (LLM) settings
    pub assistant: AssistantConfig,
    /// Chat history settings
    pub chat: ChatConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Connection pool size
    pub pool_size: u32,
}

/// Calendar integration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Base URL of the calendar REST API
    pub api_base_url: String,
    /// IANA timezone identifier attached to event payloads. Reminder
    /// instants are never converted; this labels them for the provider.
    pub timezone: String,
}

/// Intent extractor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Chat completions endpoint
    pub api_url: String,
    /// Model identifier
    pub model: String,
    /// API key; absent means the extractor cannot be constructed
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Chat history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of prior messages replayed to the extractor
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: "memora.db".to_string(), pool_size: 8 },
            calendar: CalendarConfig {
                api_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
                timezone: "Asia/Bangkok".to_string(),
            },
            assistant: AssistantConfig {
                api_url: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o-mini".to_string(),
                api_key: None,
            },
            chat: ChatConfig { history_limit: crate::constants::CHAT_HISTORY_LIMIT },
        }
    }
}
