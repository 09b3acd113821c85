use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::response::Pagination;
use crate::model::report::DailyReport;

/// Canonical submission payload. Counters are typed `u32`, so negative or
/// non-integer input is rejected at deserialization instead of being
/// silently clamped to zero. Missing counters default to 0.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitReportRequest {
    #[validate(custom = "validate_not_future")]
    pub report_date: NaiveDate,
    /// Defaults to the owner's region when absent.
    #[validate(custom = "validate_region")]
    pub region: Option<String>,

    #[serde(default)]
    pub dentists: u32,
    #[serde(default)]
    pub general_practitioners: u32,
    #[serde(default)]
    pub pediatricians: u32,
    #[serde(default)]
    pub gynecologists: u32,
    #[serde(default)]
    pub dermatologists: u32,
    #[serde(default)]
    pub cardiologists: u32,
    #[serde(default)]
    pub orthopedists: u32,

    #[serde(default)]
    pub pharmacies: u32,
    #[serde(default)]
    pub dispensaries: u32,

    #[serde(default)]
    pub orders_count: u32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub orders_value: f64,

    #[validate(custom = "validate_summary")]
    pub summary: Option<String>,
}

/// Partial update; absent fields are left untouched. Each present field is
/// re-validated under the same rules as submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReportRequest {
    #[validate(custom = "validate_not_future")]
    pub report_date: Option<NaiveDate>,
    #[validate(custom = "validate_region")]
    pub region: Option<String>,

    pub dentists: Option<u32>,
    pub general_practitioners: Option<u32>,
    pub pediatricians: Option<u32>,
    pub gynecologists: Option<u32>,
    pub dermatologists: Option<u32>,
    pub cardiologists: Option<u32>,
    pub orthopedists: Option<u32>,

    pub pharmacies: Option<u32>,
    pub dispensaries: Option<u32>,

    pub orders_count: Option<u32>,
    #[validate(range(min = 0.0))]
    pub orders_value: Option<f64>,

    #[validate(custom = "validate_summary")]
    pub summary: Option<String>,
}

pub fn validate_not_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut err = ValidationError::new("future_date");
        err.message = Some("report_date must not be in the future".into());
        return Err(err);
    }
    Ok(())
}

/// Length-checks the trimmed form, since only the trimmed summary is
/// persisted.
pub fn validate_summary(summary: &str) -> Result<(), ValidationError> {
    if summary.trim().chars().count() > 1000 {
        let mut err = ValidationError::new("summary_too_long");
        err.message = Some("summary must be at most 1000 characters".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_region(region: &str) -> Result<(), ValidationError> {
    if region.trim().is_empty() {
        let mut err = ValidationError::new("blank_region");
        err.message = Some("region must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Stored report plus the derived totals, as returned by every report
/// endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub user_id: String,
    pub report_date: NaiveDate,
    pub region: String,

    pub dentists: u32,
    pub general_practitioners: u32,
    pub pediatricians: u32,
    pub gynecologists: u32,
    pub dermatologists: u32,
    pub cardiologists: u32,
    pub orthopedists: u32,

    pub pharmacies: u32,
    pub dispensaries: u32,

    pub orders_count: u32,
    pub orders_value: f64,

    pub summary: Option<String>,

    pub total_doctors: u32,
    pub total_visits: u32,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<DailyReport> for ReportResponse {
    fn from(report: DailyReport) -> Self {
        let total_doctors = report.total_doctors();
        let total_visits = report.total_visits();
        ReportResponse {
            id: report.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: report.user_id.to_hex(),
            report_date: report.report_date,
            region: report.region,
            dentists: report.dentists,
            general_practitioners: report.general_practitioners,
            pediatricians: report.pediatricians,
            gynecologists: report.gynecologists,
            dermatologists: report.dermatologists,
            cardiologists: report.cardiologists,
            orthopedists: report.orthopedists,
            pharmacies: report.pharmacies,
            dispensaries: report.dispensaries,
            orders_count: report.orders_count,
            orders_value: report.orders_value,
            summary: report.summary,
            total_doctors,
            total_visits,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedReports {
    pub reports: Vec<ReportResponse>,
    pub pagination: Pagination,
}
