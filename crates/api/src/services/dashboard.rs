//! Read-only dashboard views. Every call recomputes from the store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use domain::models::dashboard::{
    ActivityItem, DashboardQuery, DashboardStats, LocationSnapshot, StaffPerformance,
    UpcomingShift,
};
use domain::services::aggregation::{
    build_activity, build_location_snapshot, build_staff_performance, build_stats,
    build_upcoming_shifts, effective_limit, DEFAULT_ACTIVITY_LIMIT, DEFAULT_MAP_LIMIT,
    DEFAULT_PERFORMANCE_LIMIT, DEFAULT_UPCOMING_LIMIT, UPCOMING_WINDOW_DAYS,
};
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};

pub struct DashboardService {
    store: Arc<dyn WorkforceStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, caller: &Caller) -> Result<DashboardStats, DomainError> {
        authorize(caller, Resource::Dashboard, Action::Read)?;
        let counts = self.store.dashboard_counts().await?;
        Ok(build_stats(&counts))
    }

    pub async fn activities(
        &self,
        caller: &Caller,
        query: DashboardQuery,
    ) -> Result<Vec<ActivityItem>, DomainError> {
        authorize(caller, Resource::Dashboard, Action::Read)?;
        let limit = effective_limit(query.limit, DEFAULT_ACTIVITY_LIMIT);
        let incidents = self.store.recent_incidents(limit).await?;
        Ok(build_activity(incidents, Utc::now()))
    }

    pub async fn performance(
        &self,
        caller: &Caller,
        query: DashboardQuery,
    ) -> Result<Vec<StaffPerformance>, DomainError> {
        authorize(caller, Resource::Dashboard, Action::Read)?;
        let limit = effective_limit(query.limit, DEFAULT_PERFORMANCE_LIMIT);
        let facts = self.store.staff_facts(limit).await?;
        Ok(build_staff_performance(facts))
    }

    /// Schedules from today through the next week.
    pub async fn upcoming_shifts(
        &self,
        caller: &Caller,
        query: DashboardQuery,
    ) -> Result<Vec<UpcomingShift>, DomainError> {
        authorize(caller, Resource::Dashboard, Action::Read)?;
        let limit = effective_limit(query.limit, DEFAULT_UPCOMING_LIMIT);
        let today = Utc::now().date_naive();
        let until = today + Duration::days(UPCOMING_WINDOW_DAYS);
        let facts = self.store.upcoming_shift_facts(today, until, limit).await?;
        Ok(build_upcoming_shifts(facts))
    }

    pub async fn map(
        &self,
        caller: &Caller,
        query: DashboardQuery,
    ) -> Result<Vec<LocationSnapshot>, DomainError> {
        authorize(caller, Resource::Dashboard, Action::Read)?;
        let limit = effective_limit(query.limit, DEFAULT_MAP_LIMIT);
        let facts = self
            .store
            .location_facts(Utc::now().date_naive(), limit)
            .await?;
        Ok(build_location_snapshot(facts))
    }
}
