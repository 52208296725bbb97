//! In-memory session state.
//!
//! The access token lives only here, for as long as the process runs. The
//! durable session is the refresh cookie held by the transport.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::token::AccessToken;

/// Why a session was torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The refresh route refused the durable credential.
    RefreshRejected,
    /// The refresh route could not be reached or answered nonsense.
    RefreshFailed,
    /// The user asked to sign out.
    UserRequested,
}

/// Process-wide "you are logged out" hook.
///
/// A browser shell redirects to its unauthenticated entry point here; a CLI
/// prints a hint. Called once each time a session ends.
pub trait LogoutSignal: Send + Sync {
    fn logged_out(&self, reason: LogoutReason);
}

/// Default hook: records the event and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogoutSignal;

impl LogoutSignal for TracingLogoutSignal {
    fn logged_out(&self, reason: LogoutReason) {
        tracing::warn!(?reason, "session ended");
    }
}

/// Holder of the current access token.
///
/// Clones share the same slot, so a write through one handle is visible to
/// every other handle as soon as [`Session::set_token`] returns.
///
/// # Example
/// ```
/// use jobblog::auth::Session;
///
/// let session = Session::new();
/// assert!(session.get_token().is_none());
/// session.set_token("header.payload.sig");
/// assert_eq!(session.get_token().unwrap().as_str(), "header.payload.sig");
/// session.clear_token();
/// assert!(session.get_token().is_none());
/// ```
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<AccessToken>>>,
    signal: Arc<dyn LogoutSignal>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.get_token())
            .field("signal", &"..")
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_logout_signal(Arc::new(TracingLogoutSignal))
    }

    pub fn with_logout_signal(signal: Arc<dyn LogoutSignal>) -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            signal,
        }
    }

    pub fn get_token(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current token. No validation happens here.
    pub fn set_token(&self, token: impl Into<AccessToken>) {
        let token = token.into();
        tracing::debug!(token = %token.preview(), "access token updated");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Clear the token and fire the logout signal.
    pub fn end(&self, reason: LogoutReason) {
        self.clear_token();
        self.signal.logged_out(reason);
    }
}
