//! Typed records exchanged with the lead management API

mod contact;
mod enums;
mod interaction;
mod metrics;
mod restaurant;
mod user;

pub use contact::*;
pub use enums::*;
pub use interaction::*;
pub use metrics::*;
pub use restaurant::*;
pub use user::*;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Anything with a server-assigned integer identifier
pub trait Record {
    fn id(&self) -> i64;
}

/// The four record collections the API exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Restaurants,
    Contacts,
    Interactions,
    Users,
}

impl ResourceKind {
    /// Collection path under the API root
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Restaurants => "/api/restaurants",
            ResourceKind::Contacts => "/api/contacts",
            ResourceKind::Interactions => "/api/interactions",
            ResourceKind::Users => "/api/users",
        }
    }

    /// Singular noun, used in fallback error messages
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Restaurants => "restaurant",
            ResourceKind::Contacts => "contact",
            ResourceKind::Interactions => "interaction",
            ResourceKind::Users => "user",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Restaurants => "restaurants",
            ResourceKind::Contacts => "contacts",
            ResourceKind::Interactions => "interactions",
            ResourceKind::Users => "users",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// Body of a successful create or update.
///
/// Some deployments echo the stored record, others reply with a short
/// acknowledgement such as `{"message": "Contact created", "id": 12}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Saved<T> {
    Record(T),
    Ack {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        id: Option<i64>,
    },
}

impl<T: Record> Saved<T> {
    /// Identifier of the saved record, when the server reported one
    pub fn id(&self) -> Option<i64> {
        match self {
            Saved::Record(record) => Some(record.id()),
            Saved::Ack { id, .. } => *id,
        }
    }
}

impl<T> Saved<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Saved::Record(record) => Some(record),
            Saved::Ack { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Saved::Record(record) => Some(record),
            Saved::Ack { .. } => None,
        }
    }
}

/// Accepts `1200.5`, `"1200.50"` or `null`. Decimal columns arrive as strings
/// from some serializers.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
