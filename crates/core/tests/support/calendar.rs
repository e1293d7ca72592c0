//! Mock calendar gateway and session provider for testing

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use memora_core::{CalendarGateway, SessionProvider};
use memora_domain::{MemoraError, NewReminder, Result as DomainResult, Session};

/// What the mock gateway does on `create_event`.
#[derive(Debug, Clone)]
pub enum CreateEventBehavior {
    /// Return sequential event ids ("evt-1", "evt-2", ...)
    Succeed,
    /// Fail as if no provider token were present
    AuthRequired,
    /// Fail with an upstream status and message
    ApiError(u16, String),
}

/// Scriptable in-memory `CalendarGateway`.
pub struct MockCalendarGateway {
    behavior: Mutex<CreateEventBehavior>,
    connected: AtomicBool,
    create_calls: AtomicUsize,
    check_calls: AtomicUsize,
    next_event: AtomicUsize,
}

impl MockCalendarGateway {
    pub fn new(behavior: CreateEventBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            connected: AtomicBool::new(true),
            create_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
            next_event: AtomicUsize::new(0),
        })
    }

    pub fn set_behavior(&self, behavior: CreateEventBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarGateway for MockCalendarGateway {
    async fn check_connection(&self, _owner_id: &str) -> bool {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.connected.load(Ordering::SeqCst)
    }

    async fn create_event(
        &self,
        _owner_id: &str,
        _reminder: &NewReminder,
    ) -> DomainResult<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior.lock().unwrap().clone() {
            CreateEventBehavior::Succeed => {
                let seq = self.next_event.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("evt-{seq}"))
            }
            CreateEventBehavior::AuthRequired => Err(MemoraError::AuthRequired(
                "no access token available, please reconnect your calendar".into(),
            )),
            CreateEventBehavior::ApiError(status, message) => {
                Err(MemoraError::ExternalApi { status, message })
            }
        }
    }
}

/// In-memory `SessionProvider` holding a single session.
#[derive(Default)]
pub struct MockSessionProvider {
    session: Mutex<Option<Session>>,
}

impl MockSessionProvider {
    pub fn signed_in(user_id: &str, token: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(Some(Session {
                user_id: user_id.to_string(),
                provider_access_token: token.map(str::to_string),
            })),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn current_session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }
}
