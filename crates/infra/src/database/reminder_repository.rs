//! SQLite-backed implementation of the ReminderRepository port.
//!
//! Every statement filters on the owner column; a reminder owned by another
//! user behaves exactly like a missing row.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use memora_core::ReminderRepository;
use memora_domain::{
    MemoraError, NewReminder, Reminder, ReminderPatch, Result,
};
use rusqlite::{Row, ToSql};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::InfraError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

const REMINDER_COLUMNS: &str = "id, owner_id, title, description, date, time, \
     lead_minutes, calendar_event_id, created_at, updated_at";

/// SQLite implementation of ReminderRepository
pub struct SqliteReminderRepository {
    db: Arc<DbManager>,
}

impl SqliteReminderRepository {
    /// Create a new reminder repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReminderRepository for SqliteReminderRepository {
    #[instrument(skip(self, fields), fields(owner_id))]
    async fn create(&self, owner_id: &str, fields: NewReminder) -> Result<Reminder> {
        let conn = self.db.get_connection()?;

        let now = Utc::now().timestamp();
        let reminder = Reminder {
            id: Uuid::now_v7().to_string(),
            owner_id: owner_id.to_string(),
            title: fields.title,
            description: fields.description,
            date: fields.date,
            time: fields.time,
            lead_minutes: fields.lead_minutes,
            calendar_event_id: fields.calendar_event_id,
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            "INSERT INTO reminders (
                id, owner_id, title, description, date, time,
                scheduled_ts, lead_minutes, calendar_event_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            [
                &reminder.id as &dyn ToSql,
                &reminder.owner_id,
                &reminder.title,
                &reminder.description,
                &reminder.date.format(DATE_FORMAT).to_string(),
                &reminder.time.format(TIME_FORMAT).to_string(),
                &scheduled_ts(&reminder),
                &reminder.lead_minutes,
                &reminder.calendar_event_id,
                &reminder.created_at,
                &reminder.updated_at,
            ]
            .as_ref(),
        )
        .map_err(InfraError::from)?;

        debug!(owner_id, reminder_id = %reminder.id, "inserted reminder");

        Ok(reminder)
    }

    #[instrument(skip(self), fields(owner_id, id))]
    async fn get(&self, owner_id: &str, id: &str) -> Result<Reminder> {
        let conn = self.db.get_connection()?;

        let result = conn.query_row(
            &format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1 AND owner_id = ?2"),
            [&id as &dyn ToSql, &owner_id].as_ref(),
            map_reminder_row,
        );

        match result {
            Ok(reminder) => Ok(reminder),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(MemoraError::NotFound(format!("reminder {id} not found")))
            }
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    #[instrument(skip(self), fields(owner_id))]
    async fn list_upcoming(&self, owner_id: &str, now: NaiveDateTime) -> Result<Vec<Reminder>> {
        let conn = self.db.get_connection()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {REMINDER_COLUMNS} FROM reminders
                 WHERE owner_id = ?1 AND scheduled_ts >= ?2
                 ORDER BY scheduled_ts ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(
                [&owner_id as &dyn ToSql, &now.and_utc().timestamp()].as_ref(),
                map_reminder_row,
            )
            .map_err(InfraError::from)?
            .collect::<std::result::Result<Vec<Reminder>, _>>()
            .map_err(InfraError::from)?;

        debug!(owner_id, count = rows.len(), "listed upcoming reminders");

        Ok(rows)
    }

    #[instrument(skip(self, patch), fields(owner_id, id))]
    async fn update(&self, owner_id: &str, id: &str, patch: ReminderPatch) -> Result<Reminder> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        let mut reminder = match tx.query_row(
            &format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1 AND owner_id = ?2"),
            [&id as &dyn ToSql, &owner_id].as_ref(),
            map_reminder_row,
        ) {
            Ok(reminder) => reminder,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(MemoraError::NotFound(format!("reminder {id} not found")));
            }
            Err(e) => return Err(InfraError::from(e).into()),
        };

        if let Some(title) = patch.title {
            reminder.title = title;
        }
        if let Some(description) = patch.description {
            reminder.description = Some(description);
        }
        if let Some(date) = patch.date {
            reminder.date = date;
        }
        if let Some(time) = patch.time {
            reminder.time = time;
        }
        if let Some(lead) = patch.lead_minutes {
            reminder.lead_minutes = lead;
        }
        reminder.updated_at = Utc::now().timestamp();

        tx.execute(
            "UPDATE reminders
             SET title = ?1, description = ?2, date = ?3, time = ?4,
                 scheduled_ts = ?5, lead_minutes = ?6, updated_at = ?7
             WHERE id = ?8 AND owner_id = ?9",
            [
                &reminder.title as &dyn ToSql,
                &reminder.description,
                &reminder.date.format(DATE_FORMAT).to_string(),
                &reminder.time.format(TIME_FORMAT).to_string(),
                &scheduled_ts(&reminder),
                &reminder.lead_minutes,
                &reminder.updated_at,
                &id,
                &owner_id,
            ]
            .as_ref(),
        )
        .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;

        debug!(owner_id, reminder_id = %reminder.id, "updated reminder");

        Ok(reminder)
    }

    #[instrument(skip(self), fields(owner_id, id))]
    async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        let conn = self.db.get_connection()?;

        let deleted = conn
            .execute(
                "DELETE FROM reminders WHERE id = ?1 AND owner_id = ?2",
                [&id as &dyn ToSql, &owner_id].as_ref(),
            )
            .map_err(InfraError::from)?;

        if deleted == 0 {
            return Err(MemoraError::NotFound(format!("reminder {id} not found")));
        }

        debug!(owner_id, reminder_id = id, "deleted reminder");

        Ok(())
    }

    #[instrument(skip(self), fields(owner_id, id))]
    async fn set_calendar_event_id(
        &self,
        owner_id: &str,
        id: &str,
        event_id: &str,
    ) -> Result<Reminder> {
        let conn = self.db.get_connection()?;

        // The IS NULL guard enforces the set-at-most-once invariant in SQL.
        let updated = conn
            .execute(
                "UPDATE reminders
                 SET calendar_event_id = ?1, updated_at = ?2
                 WHERE id = ?3 AND owner_id = ?4 AND calendar_event_id IS NULL",
                [
                    &event_id as &dyn ToSql,
                    &Utc::now().timestamp(),
                    &id,
                    &owner_id,
                ]
                .as_ref(),
            )
            .map_err(InfraError::from)?;

        if updated == 0 {
            let existing = self.get(owner_id, id).await?;
            return Err(MemoraError::Internal(format!(
                "calendar event id already set for reminder {} ({:?})",
                existing.id, existing.calendar_event_id
            )));
        }

        debug!(owner_id, reminder_id = id, event_id, "recorded calendar event id");

        self.get(owner_id, id).await
    }
}

fn scheduled_ts(reminder: &Reminder) -> i64 {
    reminder.scheduled_at().and_utc().timestamp()
}

fn map_reminder_row(row: &Row<'_>) -> rusqlite::Result<Reminder> {
    let date_text: String = row.get(4)?;
    let time_text: String = row.get(5)?;

    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let time = NaiveTime::parse_from_str(&time_text, TIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Reminder {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        date,
        time,
        lead_minutes: row.get(6)?,
        calendar_event_id: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
