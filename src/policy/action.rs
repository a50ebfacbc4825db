use std::fmt;

use crate::models::ResourceKind;

/// Something a view may offer to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List(ResourceKind),
    View(ResourceKind),
    Create(ResourceKind),
    Edit(ResourceKind),
    Delete(ResourceKind),
    ViewMetrics,
}

impl Action {
    /// Adding a role-based user
    pub const CREATE_USER: Action = Action::Create(ResourceKind::Users);
    pub const EDIT_USER: Action = Action::Edit(ResourceKind::Users);
    pub const DELETE_USER: Action = Action::Delete(ResourceKind::Users);
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::List(kind) => write!(f, "list {}", kind.plural()),
            Action::View(kind) => write!(f, "view {}", kind.singular()),
            Action::Create(kind) => write!(f, "create {}", kind.singular()),
            Action::Edit(kind) => write!(f, "edit {}", kind.singular()),
            Action::Delete(kind) => write!(f, "delete {}", kind.singular()),
            Action::ViewMetrics => write!(f, "view metrics"),
        }
    }
}
