//! In-process session manager
//!
//! Implements the `SessionProvider` port consumed by the calendar gateway.
//! The real identity provider lives outside this system; this manager holds
//! whatever session it last handed us and broadcasts auth-state transitions
//! so derived state (the calendar connection cache) can invalidate itself.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use memora_core::{CalendarConnectionState, SessionProvider};
use memora_domain::Session;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Auth-state notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    SignedOut,
    SignedIn,
}

/// Holds the current session and publishes auth-state changes.
pub struct SessionManager {
    session: RwLock<Option<Session>>,
    tx: watch::Sender<AuthState>,
}

impl SessionManager {
    /// Create a signed-out session manager.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::SignedOut);
        Self { session: RwLock::new(None), tx }
    }

    /// Replace the current session after the provider authenticated a user.
    pub fn sign_in(&self, session: Session) {
        info!(user_id = %session.user_id, "session signed in");
        *self.write_lock() = Some(session);
        // Receivers only care that the state changed, not whether the value
        // differs from the previous one (reconnect re-sends SignedIn).
        let _ = self.tx.send(AuthState::SignedIn);
    }

    /// Clear the session on sign-out.
    pub fn sign_out(&self) {
        info!("session signed out");
        *self.write_lock() = None;
        let _ = self.tx.send(AuthState::SignedOut);
    }

    /// Update the calendar provider token in place (token refresh or a
    /// reconnect that granted new scopes).
    pub fn update_provider_token(&self, token: Option<String>) {
        let mut guard = self.write_lock();
        if let Some(session) = guard.as_mut() {
            session.provider_access_token = token;
            drop(guard);
            debug!("provider token updated");
            let _ = self.tx.send(AuthState::SignedIn);
        }
    }

    /// Subscribe to auth-state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.session.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for SessionManager {
    async fn current_session(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

/// Invalidate the calendar connection cache on every auth transition.
///
/// Runs until the session manager is dropped.
pub fn watch_auth_changes(
    connection: Arc<CalendarConnectionState>,
    mut rx: watch::Receiver<AuthState>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            debug!(state = ?*rx.borrow(), "auth state changed; invalidating connection cache");
            connection.invalidate();
        }
    })
}
