//! Aggregates served by the read-only metrics endpoints

use serde::{Deserialize, Serialize};

use super::lenient_f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageInteractionDuration {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    /// Minutes
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_interaction_duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderperformingRestaurant {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    /// Days since the last interaction, absent when there never was one
    #[serde(default)]
    pub time_since_last_interaction: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub performance_score: Option<f64>,
}
