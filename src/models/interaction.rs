//! Calls, meetings and visits logged against a restaurant

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{InteractionOutcome, InteractionType, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub interaction_date: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub outcome: Option<InteractionOutcome>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub contact_id: Option<i64>,
}

impl Record for Interaction {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionDraft {
    /// Sent as `YYYY-MM-DD`
    pub interaction_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<InteractionOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<i64>,
}

impl From<&Interaction> for InteractionDraft {
    fn from(i: &Interaction) -> Self {
        Self {
            interaction_date: i.interaction_date.date(),
            kind: i.kind,
            details: i.details.clone(),
            outcome: i.outcome,
            duration_minutes: i.duration_minutes,
            restaurant_id: i.restaurant_id,
            contact_id: i.contact_id,
        }
    }
}
