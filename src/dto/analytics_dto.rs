use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar date of the caller's own activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_doctors: u64,
    pub total_pharmacies: u64,
    pub total_dispensaries: u64,
    pub total_orders: u64,
    pub total_value: f64,
}

/// One `YYYY-MM` month of the caller's own activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    pub reports_count: u64,
    pub total_doctors: u64,
    pub total_pharmacies: u64,
    pub total_dispensaries: u64,
    pub total_orders: u64,
    pub total_value: f64,
}

/// One row per active representative, zero-report reps included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepPerformance {
    pub user_id: String,
    pub user_name: String,
    pub region: Option<String>,
    pub reports_count: u64,
    pub total_doctors: u64,
    pub total_visits: u64,
    pub total_orders: u64,
    pub total_value: f64,
}

/// One row per region with at least one in-window report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPerformance {
    pub region: String,
    /// Distinct representatives contributing reports in the window.
    pub active_reps: u64,
    pub reports_count: u64,
    pub total_doctors: u64,
    pub total_orders: u64,
    pub total_value: f64,
}

#[derive(Debug, Deserialize)]
pub struct TeamPerformanceQuery {
    /// `week`, `month`, or absent for all-time.
    pub period: Option<String>,
}
