//! Integration tests for the reminder workflow orchestrator
//!
//! Drive `ReminderService` against in-memory mocks and assert the
//! sync-before-persist ordering and failure policy.

mod support;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use memora_core::{CalendarConnectionState, CalendarGateway, CalendarSyncOutcome, ReminderService};
use memora_domain::{
    ManualReminderInput, MemoraError, Reminder, ReminderDraft, ReminderPatch,
};
use support::calendar::{CreateEventBehavior, MockCalendarGateway};
use support::repositories::MockReminderRepository;

const OWNER: &str = "user-1";

fn service(
    repository: Arc<MockReminderRepository>,
    calendar: Arc<MockCalendarGateway>,
) -> ReminderService {
    ReminderService::new(repository, calendar)
}

fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap().and_hms_opt(9, 0, 0).unwrap()
}

fn chat_draft() -> ReminderDraft {
    ReminderDraft {
        title: "Meeting with Mom".to_string(),
        description: Some("Dinner at the usual place".to_string()),
        time_of_day: "18:00".to_string(),
        relative_day: "tomorrow".to_string(),
    }
}

fn manual_input(lead: Option<u32>) -> ManualReminderInput {
    ManualReminderInput {
        title: "Dentist".to_string(),
        description: None,
        date: NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
        time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        lead_minutes: lead,
    }
}

fn stored_reminder(id: &str, owner: &str, day: u32, event_id: Option<&str>) -> Reminder {
    Reminder {
        id: id.to_string(),
        owner_id: owner.to_string(),
        title: format!("reminder {id}"),
        description: None,
        date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
        time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        lead_minutes: 10,
        calendar_event_id: event_id.map(str::to_string),
        created_at: 0,
        updated_at: 0,
    }
}

#[tokio::test]
async fn save_from_chat_persists_synced_reminder() {
    let repository = MockReminderRepository::new();
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(Arc::clone(&repository), Arc::clone(&calendar));

    let saved = service.save_from_chat(OWNER, &chat_draft(), reference_now()).await.unwrap();

    assert!(matches!(saved.sync, CalendarSyncOutcome::Synced { ref event_id } if event_id == "evt-1"));
    assert_eq!(saved.reminder.calendar_event_id.as_deref(), Some("evt-1"));
    assert_eq!(saved.reminder.lead_minutes, 30);
    assert_eq!(saved.reminder.scheduled_at().to_string(), "2024-04-02 18:00:00");
    assert_eq!(repository.len(), 1);
    assert_eq!(calendar.create_calls(), 1);
}

#[tokio::test]
async fn save_from_chat_writes_nothing_when_auth_required() {
    let repository = MockReminderRepository::new();
    let calendar = MockCalendarGateway::new(CreateEventBehavior::AuthRequired);
    let service = service(Arc::clone(&repository), calendar);

    let result = service.save_from_chat(OWNER, &chat_draft(), reference_now()).await;

    match result {
        Err(MemoraError::AuthRequired(message)) => {
            assert!(message.contains("reconnect"));
        }
        other => panic!("expected auth-required error, got {other:?}"),
    }
    assert_eq!(repository.len(), 0, "no orphaned row may be written");
}

#[tokio::test]
async fn save_from_chat_persists_despite_api_failure() {
    let repository = MockReminderRepository::new();
    let calendar = MockCalendarGateway::new(CreateEventBehavior::ApiError(
        500,
        "backend unavailable".to_string(),
    ));
    let service = service(Arc::clone(&repository), calendar);

    let saved = service.save_from_chat(OWNER, &chat_draft(), reference_now()).await.unwrap();

    match saved.sync {
        CalendarSyncOutcome::Unsynced { warning } => assert!(warning.contains("500")),
        other => panic!("expected unsynced outcome, got {other:?}"),
    }
    assert_eq!(repository.len(), 1, "sync failure must not block persistence");
    assert!(saved.reminder.calendar_event_id.is_none());
}

#[tokio::test]
async fn save_from_chat_rejects_malformed_time_before_any_side_effect() {
    let repository = MockReminderRepository::new();
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(Arc::clone(&repository), Arc::clone(&calendar));

    let mut draft = chat_draft();
    draft.time_of_day = "25:00".to_string();

    let result = service.save_from_chat(OWNER, &draft, reference_now()).await;

    assert!(matches!(result, Err(MemoraError::Validation(_))));
    assert_eq!(calendar.create_calls(), 0);
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn save_manual_defaults_lead_to_ten_minutes() {
    let repository = MockReminderRepository::new();
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(Arc::clone(&repository), calendar);

    let saved = service.save_manual(OWNER, manual_input(None)).await.unwrap();
    assert_eq!(saved.reminder.lead_minutes, 10);

    let saved = service.save_manual(OWNER, manual_input(Some(60))).await.unwrap();
    assert_eq!(saved.reminder.lead_minutes, 60);
}

#[tokio::test]
async fn save_manual_rejects_blank_title() {
    let repository = MockReminderRepository::new();
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(Arc::clone(&repository), Arc::clone(&calendar));

    let mut input = manual_input(None);
    input.title = "   ".to_string();

    let result = service.save_manual(OWNER, input).await;

    assert!(matches!(result, Err(MemoraError::Validation(_))));
    assert_eq!(calendar.create_calls(), 0);
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn edit_updates_only_patched_fields() {
    let repository = MockReminderRepository::new();
    repository.insert_row(stored_reminder("rem-a", OWNER, 10, None));
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(Arc::clone(&repository), Arc::clone(&calendar));

    let patch = ReminderPatch { title: Some("Renamed".to_string()), ..Default::default() };
    let updated = service.edit(OWNER, "rem-a", patch).await.unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
    assert_eq!(updated.lead_minutes, 10);
    // Editing never touches the external calendar.
    assert_eq!(calendar.create_calls(), 0);
}

#[tokio::test]
async fn edit_unknown_id_is_not_found() {
    let repository = MockReminderRepository::new();
    repository.insert_row(stored_reminder("rem-a", "someone-else", 10, None));
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(repository, calendar);

    let patch = ReminderPatch { title: Some("Renamed".to_string()), ..Default::default() };
    let result = service.edit(OWNER, "rem-a", patch).await;

    assert!(matches!(result, Err(MemoraError::NotFound(_))));
}

#[tokio::test]
async fn remove_deletes_row_and_missing_id_is_not_found() {
    let repository = MockReminderRepository::new();
    repository.insert_row(stored_reminder("rem-a", OWNER, 10, None));
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(Arc::clone(&repository), calendar);

    service.remove(OWNER, "rem-a").await.unwrap();
    assert_eq!(repository.len(), 0);

    let result = service.remove(OWNER, "rem-a").await;
    assert!(matches!(result, Err(MemoraError::NotFound(_))));
}

#[tokio::test]
async fn list_upcoming_is_owner_scoped_and_sorted() {
    let repository = MockReminderRepository::new();
    repository.insert_row(stored_reminder("past", OWNER, 1, None));
    repository.insert_row(stored_reminder("later", OWNER, 20, None));
    repository.insert_row(stored_reminder("sooner", OWNER, 5, None));
    repository.insert_row(stored_reminder("foreign", "someone-else", 12, None));
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(repository, calendar);

    let upcoming = service.list_upcoming(OWNER, reference_now()).await.unwrap();

    let ids: Vec<&str> = upcoming.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["sooner", "later"]);
    assert!(upcoming.iter().all(|r| r.owner_id == OWNER));
    assert!(upcoming.iter().all(|r| r.scheduled_at() >= reference_now()));
}

#[tokio::test]
async fn round_trip_preserves_reminder_fields() {
    let repository = MockReminderRepository::new();
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(repository, calendar);

    let input = ManualReminderInput {
        title: "Meeting".to_string(),
        description: Some("quarterly review".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
        time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        lead_minutes: Some(30),
    };

    service.save_manual(OWNER, input).await.unwrap();

    let upcoming = service.list_upcoming(OWNER, reference_now()).await.unwrap();
    assert_eq!(upcoming.len(), 1);
    let read_back = &upcoming[0];
    assert_eq!(read_back.title, "Meeting");
    assert_eq!(read_back.date, NaiveDate::from_ymd_opt(2024, 4, 9).unwrap());
    assert_eq!(read_back.time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    assert_eq!(read_back.lead_minutes, 30);
}

#[tokio::test]
async fn sync_to_calendar_guards_against_duplicate_events() {
    let repository = MockReminderRepository::new();
    repository.insert_row(stored_reminder("rem-a", OWNER, 10, Some("evt-existing")));
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(repository, Arc::clone(&calendar));

    let outcome = service.sync_to_calendar(OWNER, "rem-a").await.unwrap();

    assert!(matches!(
        outcome.sync,
        CalendarSyncOutcome::AlreadySynced { ref event_id } if event_id == "evt-existing"
    ));
    assert_eq!(calendar.create_calls(), 0, "no duplicate event may be created");
}

#[tokio::test]
async fn sync_to_calendar_records_event_id_once() {
    let repository = MockReminderRepository::new();
    repository.insert_row(stored_reminder("rem-a", OWNER, 10, None));
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    let service = service(Arc::clone(&repository), Arc::clone(&calendar));

    let outcome = service.sync_to_calendar(OWNER, "rem-a").await.unwrap();

    assert!(matches!(outcome.sync, CalendarSyncOutcome::Synced { .. }));
    assert_eq!(calendar.create_calls(), 1);
    let rows = repository.rows();
    assert_eq!(rows[0].calendar_event_id.as_deref(), Some("evt-1"));
}

#[tokio::test]
async fn connection_state_caches_until_invalidated() {
    let calendar = MockCalendarGateway::new(CreateEventBehavior::Succeed);
    calendar.set_connected(true);
    let state = CalendarConnectionState::new(Arc::clone(&calendar) as Arc<dyn CalendarGateway>);

    assert!(state.is_connected(OWNER).await);
    assert!(state.is_connected(OWNER).await);
    assert_eq!(calendar.check_calls(), 1, "second call must hit the cache");

    calendar.set_connected(false);
    assert!(state.is_connected(OWNER).await, "stale answer until invalidated");

    state.invalidate();
    assert!(!state.is_connected(OWNER).await);
    assert_eq!(calendar.check_calls(), 2);
}
