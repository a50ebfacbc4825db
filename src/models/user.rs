//! Users and authentication payloads

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Record, Role};

/// A user account as returned by `GET /api/users/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Record for User {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Body for creating or updating a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl From<&User> for UserDraft {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            password: None,
            role: Some(user.role),
        }
    }
}

/// Self-service sign-up form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// Login credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token grant returned by login and registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub access_token: String,
    pub id: i64,
}
