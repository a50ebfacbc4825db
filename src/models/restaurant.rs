//! Restaurant leads

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{lenient_f64, CallFrequency, Contact, Interaction, Record, RestaurantStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: RestaurantStatus,
    #[serde(default)]
    pub call_frequency: CallFrequency,
    #[serde(default)]
    pub last_call_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned_kam_id: Option<i64>,
    /// Only populated by the detail endpoint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
    /// Only populated by the detail endpoint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<Interaction>,
}

impl Record for Restaurant {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Body for creating or updating a restaurant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RestaurantStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_frequency: Option<CallFrequency>,
    /// Sent as `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_call_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_kam_id: Option<i64>,
}

impl From<&Restaurant> for RestaurantDraft {
    fn from(r: &Restaurant) -> Self {
        Self {
            name: r.name.clone(),
            address: r.address.clone(),
            status: Some(r.status),
            call_frequency: Some(r.call_frequency),
            last_call_date: r.last_call_date.map(|d| d.date()),
            revenue: r.revenue,
            notes: r.notes.clone(),
            assigned_kam_id: r.assigned_kam_id,
        }
    }
}
