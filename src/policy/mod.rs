//! Client-side authorization view-filter
//!
//! Decides which actions a view may offer to the current session. This is a
//! UI affordance check only; the API enforces its own rules.

mod action;

pub use action::Action;

use crate::models::{ResourceKind, Role};

/// The policy table.
///
/// `target` is the id of the record the action applies to, when there is one.
pub fn can_perform(role: Role, actor_id: i64, action: Action, target: Option<i64>) -> bool {
    match action {
        Action::Create(ResourceKind::Users) | Action::Delete(ResourceKind::Users) => {
            role == Role::Admin
        }
        Action::Edit(ResourceKind::Users) => {
            role == Role::Admin || target.is_some_and(|id| id == actor_id)
        }
        Action::List(_)
        | Action::View(_)
        | Action::Create(_)
        | Action::Edit(_)
        | Action::Delete(_)
        | Action::ViewMetrics => true,
    }
}
