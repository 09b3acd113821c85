use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use tracing::instrument;

use crate::dto::analytics_dto::{
    DailySummary, MonthlySummary, RegionPerformance, RepPerformance,
};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::model::user::UserRole;
use crate::repository::report_repo::ReportRepository;
use crate::repository::user_repo::UserRepository;
use crate::service::aggregation;
use crate::util::error::ServiceError;

/// Personal monthly history is capped at the most recent 12 months.
const MAX_MONTHS: usize = 12;

/// Trailing-window start date, inclusive of today.
fn window_start(days: u64) -> NaiveDate {
    let today = Utc::now().date_naive();
    today.checked_sub_days(Days::new(days - 1)).unwrap_or(today)
}

/// `week` and `month` map to trailing 7/30-day windows; anything else is
/// unrestricted.
fn period_window(period: Option<&str>) -> Option<NaiveDate> {
    match period {
        Some("week") => Some(window_start(7)),
        Some("month") => Some(window_start(30)),
        _ => None,
    }
}

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn personal_weekly(&self, caller: &CurrentUser)
        -> Result<Vec<DailySummary>, ServiceError>;
    async fn personal_monthly(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<MonthlySummary>, ServiceError>;
    async fn team_performance(
        &self,
        period: Option<&str>,
    ) -> Result<Vec<RepPerformance>, ServiceError>;
    async fn region_performance(&self) -> Result<Vec<RegionPerformance>, ServiceError>;
}

pub struct AnalyticsServiceImpl {
    pub report_repo: Arc<dyn ReportRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl AnalyticsServiceImpl {
    pub fn new(report_repo: Arc<dyn ReportRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            report_repo,
            user_repo,
        }
    }
}

#[async_trait]
impl AnalyticsService for AnalyticsServiceImpl {
    #[instrument(skip(self), fields(user = %caller.username))]
    async fn personal_weekly(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<DailySummary>, ServiceError> {
        let reports = self
            .report_repo
            .find_by_owner_since(&caller.id, Some(window_start(7)))
            .await?;
        Ok(aggregation::daily_summaries(&reports))
    }

    #[instrument(skip(self), fields(user = %caller.username))]
    async fn personal_monthly(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<MonthlySummary>, ServiceError> {
        let reports = self.report_repo.find_by_owner_since(&caller.id, None).await?;
        Ok(aggregation::monthly_summaries(&reports, MAX_MONTHS))
    }

    #[instrument(skip(self))]
    async fn team_performance(
        &self,
        period: Option<&str>,
    ) -> Result<Vec<RepPerformance>, ServiceError> {
        let reps = self
            .user_repo
            .list(Some(UserRole::MedRep), Some(true))
            .await?;
        let reports = self
            .report_repo
            .find_since(period_window(period))
            .await?;
        Ok(aggregation::team_performance(&reps, &reports))
    }

    #[instrument(skip(self))]
    async fn region_performance(&self) -> Result<Vec<RegionPerformance>, ServiceError> {
        let reports = self
            .report_repo
            .find_since(Some(window_start(30)))
            .await?;
        Ok(aggregation::region_performance(&reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_window_mapping() {
        assert!(period_window(Some("week")).is_some());
        assert!(period_window(Some("month")).is_some());
        assert!(period_window(Some("all")).is_none());
        assert!(period_window(None).is_none());
        // the month window opens no later than the week window
        assert!(period_window(Some("month")) <= period_window(Some("week")));
    }

    #[test]
    fn test_window_start_counts_today() {
        let today = Utc::now().date_naive();
        assert_eq!(window_start(1), today);
    }
}
