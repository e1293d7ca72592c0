//! Mock repository implementations for testing
//!
//! In-memory mocks for the reminder and chat-message stores, enabling
//! deterministic workflow tests without a database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use memora_core::{ChatMessageRepository, ReminderRepository};
use memora_domain::{
    ChatMessage, ChatRole, MemoraError, NewReminder, Reminder, ReminderPatch,
    Result as DomainResult,
};

/// In-memory mock for `ReminderRepository`.
///
/// Assigns sequential ids and timestamps so assertions stay deterministic.
#[derive(Default)]
pub struct MockReminderRepository {
    rows: Mutex<Vec<Reminder>>,
    next_id: AtomicUsize,
}

impl MockReminderRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed the mock with an existing reminder.
    pub fn insert_row(&self, reminder: Reminder) {
        self.rows.lock().unwrap().push(reminder);
    }

    /// Snapshot of every stored row.
    pub fn rows(&self) -> Vec<Reminder> {
        self.rows.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ReminderRepository for MockReminderRepository {
    async fn create(&self, owner_id: &str, fields: NewReminder) -> DomainResult<Reminder> {
        let seq = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let reminder = Reminder {
            id: format!("rem-{seq}"),
            owner_id: owner_id.to_string(),
            title: fields.title,
            description: fields.description,
            date: fields.date,
            time: fields.time,
            lead_minutes: fields.lead_minutes,
            calendar_event_id: fields.calendar_event_id,
            created_at: seq as i64,
            updated_at: seq as i64,
        };
        self.rows.lock().unwrap().push(reminder.clone());
        Ok(reminder)
    }

    async fn get(&self, owner_id: &str, id: &str) -> DomainResult<Reminder> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| MemoraError::NotFound(format!("reminder {id} not found")))
    }

    async fn list_upcoming(
        &self,
        owner_id: &str,
        now: NaiveDateTime,
    ) -> DomainResult<Vec<Reminder>> {
        let mut upcoming: Vec<Reminder> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id && r.scheduled_at() >= now)
            .cloned()
            .collect();
        upcoming.sort_by_key(Reminder::scheduled_at);
        Ok(upcoming)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: ReminderPatch,
    ) -> DomainResult<Reminder> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner_id)
            .ok_or_else(|| MemoraError::NotFound(format!("reminder {id} not found")))?;

        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(description) = patch.description {
            row.description = Some(description);
        }
        if let Some(date) = patch.date {
            row.date = date;
        }
        if let Some(time) = patch.time {
            row.time = time;
        }
        if let Some(lead) = patch.lead_minutes {
            row.lead_minutes = lead;
        }
        row.updated_at += 1;

        Ok(row.clone())
    }

    async fn delete(&self, owner_id: &str, id: &str) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.owner_id == owner_id));
        if rows.len() == before {
            return Err(MemoraError::NotFound(format!("reminder {id} not found")));
        }
        Ok(())
    }

    async fn set_calendar_event_id(
        &self,
        owner_id: &str,
        id: &str,
        event_id: &str,
    ) -> DomainResult<Reminder> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner_id)
            .ok_or_else(|| MemoraError::NotFound(format!("reminder {id} not found")))?;

        if row.calendar_event_id.is_some() {
            return Err(MemoraError::Internal(format!(
                "calendar event id already set for reminder {id}"
            )));
        }

        row.calendar_event_id = Some(event_id.to_string());
        row.updated_at += 1;
        Ok(row.clone())
    }
}

/// In-memory mock for `ChatMessageRepository`.
#[derive(Default)]
pub struct MockChatMessageRepository {
    messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicUsize,
}

impl MockChatMessageRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed the mock with `count` alternating user/assistant messages.
    pub fn seed_conversation(&self, owner_id: &str, count: usize) {
        for index in 0..count {
            let role = if index % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
            let seq = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.messages.lock().unwrap().push(ChatMessage {
                id: format!("msg-{seq}"),
                owner_id: owner_id.to_string(),
                role,
                content: format!("message {seq}"),
                created_at: seq as i64,
            });
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatMessageRepository for MockChatMessageRepository {
    async fn save_message(
        &self,
        owner_id: &str,
        role: ChatRole,
        content: &str,
    ) -> DomainResult<ChatMessage> {
        let seq = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let message = ChatMessage {
            id: format!("msg-{seq}"),
            owner_id: owner_id.to_string(),
            role,
            content: content.to_string(),
            created_at: seq as i64,
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn recent_messages(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> DomainResult<Vec<ChatMessage>> {
        let messages = self.messages.lock().unwrap();
        let mut recent: Vec<ChatMessage> =
            messages.iter().filter(|m| m.owner_id == owner_id).cloned().collect();
        recent.sort_by_key(|m| m.created_at);
        if recent.len() > limit {
            recent = recent.split_off(recent.len() - limit);
        }
        Ok(recent)
    }
}
