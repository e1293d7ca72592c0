//! Derived calendar connection state
//!
//! "Is the calendar connected" is not stored anywhere; it is computed on
//! demand from the gateway's connectivity probe and cached until something
//! that can change the answer happens (sign-out, reconnect). Callers own
//! the invalidation: the infra session manager wires its auth-state stream
//! to [`CalendarConnectionState::invalidate`].

use std::sync::{Arc, RwLock};

use tracing::debug;

use super::ports::CalendarGateway;

/// Cached, on-demand calendar connectivity answer for the signed-in user.
pub struct CalendarConnectionState {
    gateway: Arc<dyn CalendarGateway>,
    cached: RwLock<Option<bool>>,
}

impl CalendarConnectionState {
    /// Create an unprimed connection state.
    pub fn new(gateway: Arc<dyn CalendarGateway>) -> Self {
        Self { gateway, cached: RwLock::new(None) }
    }

    /// Whether the calendar is currently reachable with the session token.
    ///
    /// The first call after construction or invalidation probes the
    /// gateway; subsequent calls return the cached answer.
    pub async fn is_connected(&self, owner_id: &str) -> bool {
        if let Some(value) = self.read_cached() {
            return value;
        }

        let value = self.gateway.check_connection(owner_id).await;
        debug!(owner_id, connected = value, "calendar connection probed");

        *self.cached.write().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(value);
        value
    }

    /// Drop the cached answer. Called on sign-out and reconnect.
    pub fn invalidate(&self) {
        *self.cached.write().unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        debug!("calendar connection cache invalidated");
    }

    fn read_cached(&self) -> Option<bool> {
        *self.cached.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
