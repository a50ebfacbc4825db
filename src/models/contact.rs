//! People at a restaurant

use serde::{Deserialize, Serialize};

use super::{PreferredContactMethod, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    /// Job title at the restaurant, e.g. "Owner"
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub preferred_contact_method: Option<PreferredContactMethod>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl Record for Contact {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact_method: Option<PreferredContactMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl From<&Contact> for ContactDraft {
    fn from(c: &Contact) -> Self {
        Self {
            name: c.name.clone(),
            role: c.role.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            restaurant_id: c.restaurant_id,
            preferred_contact_method: c.preferred_contact_method,
            time_zone: c.time_zone.clone(),
        }
    }
}
