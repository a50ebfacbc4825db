//! Read-only dashboard aggregates

use crate::error::Result;
use crate::models::{AverageInteractionDuration, PerformanceScore, UnderperformingRestaurant};

use super::{ApiClient, RequestDescriptor};

pub const AVERAGE_DURATION_PATH: &str = "/api/metrics/average-interaction-duration";
pub const UNDERPERFORMING_PATH: &str = "/api/metrics/underperforming";
pub const PERFORMANCE_SCORES_PATH: &str = "/api/metrics/performance-scores";

pub struct MetricsApi<'a> {
    client: &'a ApiClient,
}

impl MetricsApi<'_> {
    pub async fn average_interaction_duration(&self) -> Result<Vec<AverageInteractionDuration>> {
        self.client
            .fetch(
                RequestDescriptor::get(AVERAGE_DURATION_PATH),
                "Failed to fetch average interaction duration",
            )
            .await
    }

    pub async fn underperforming(&self) -> Result<Vec<UnderperformingRestaurant>> {
        self.client
            .fetch(
                RequestDescriptor::get(UNDERPERFORMING_PATH),
                "Failed to fetch underperforming restaurants",
            )
            .await
    }

    pub async fn performance_scores(&self) -> Result<Vec<PerformanceScore>> {
        self.client
            .fetch(
                RequestDescriptor::get(PERFORMANCE_SCORES_PATH),
                "Failed to fetch performance scores",
            )
            .await
    }
}

impl ApiClient {
    pub fn metrics(&self) -> MetricsApi<'_> {
        MetricsApi { client: self }
    }
}
