//! Database implementations

pub mod chat_message_repository;
pub mod manager;
pub mod reminder_repository;

pub use chat_message_repository::SqliteChatMessageRepository;
pub use manager::DbManager;
pub use reminder_repository::SqliteReminderRepository;
