//! Session management

mod session;

pub use session::{watch_auth_changes, AuthState, SessionManager};
