//! Subscription plan lookups.
//!
//! Plans change rarely, so records are cached per plan id (5-minute TTL).

use std::time::Duration;

use moka::future::Cache;
use newtab_core::{Plan, PlanId};
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError, Transport};

/// Cached access to `GET /plan/{planId}`.
#[derive(Clone)]
pub struct PlanCache {
    cache: Cache<PlanId, Plan>,
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanCache {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        Self { cache }
    }

    /// Return the plan from cache, fetching it on a miss.
    ///
    /// # Errors
    ///
    /// Returns error if the plan has to be fetched and the request fails.
    #[instrument(skip(self, api))]
    pub async fn get<T: Transport>(
        &self,
        api: &ApiClient<T>,
        plan_id: &PlanId,
    ) -> Result<Plan, ApiError> {
        if let Some(plan) = self.cache.get(plan_id).await {
            debug!("plan cache hit");
            return Ok(plan);
        }

        let plan = api.get_plan(plan_id).await?;
        self.cache.insert(plan_id.clone(), plan.clone()).await;
        Ok(plan)
    }
}
