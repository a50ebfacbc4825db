//! Session lifecycle states

use crate::models::{Role, User};
use crate::policy::{can_perform, Action};

/// A resolved login
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

impl Session {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

/// Where the session is in its lifecycle.
///
/// `Uninitialized` and `Resolving` mean "unknown": stored credentials may
/// exist but the user record has not been fetched yet. Views should show a
/// loading state for these, and never treat them as logged out.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Resolving,
    Authenticated(Session),
    Unauthenticated,
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Still unknown whether anyone is logged in
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Resolving)
    }

    /// Whether a view may offer `action` on the record with id `target`.
    /// Always false until the session has resolved to a user.
    pub fn permits(&self, action: Action, target: Option<i64>) -> bool {
        match self {
            SessionState::Authenticated(session) => {
                can_perform(session.role(), session.user_id(), action, target)
            }
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Resolving => "resolving",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::Unauthenticated => "unauthenticated",
        }
    }
}
