use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::report_dto::{
    PaginatedReports, ReportResponse, SubmitReportRequest, UpdateReportRequest,
};
use crate::dto::response::Pagination;
use crate::middlewares::auth_middleware::CurrentUser;
use crate::model::report::DailyReport;
use crate::repository::report_repo::ReportRepository;
use crate::util::error::ServiceError;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

#[async_trait]
pub trait ReportService: Send + Sync {
    async fn submit(
        &self,
        owner: &CurrentUser,
        req: SubmitReportRequest,
    ) -> Result<ReportResponse, ServiceError>;
    async fn get_report(
        &self,
        requester: &CurrentUser,
        id: &str,
    ) -> Result<ReportResponse, ServiceError>;
    async fn update_report(
        &self,
        requester: &CurrentUser,
        id: &str,
        req: UpdateReportRequest,
    ) -> Result<ReportResponse, ServiceError>;
    async fn my_reports(
        &self,
        owner: &CurrentUser,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<PaginatedReports, ServiceError>;
}

pub struct ReportServiceImpl {
    pub report_repo: Arc<dyn ReportRepository>,
}

impl ReportServiceImpl {
    pub fn new(report_repo: Arc<dyn ReportRepository>) -> Self {
        Self { report_repo }
    }

    fn parse_report_id(id: &str) -> Result<ObjectId, ServiceError> {
        ObjectId::parse_str(id)
            .map_err(|_| ServiceError::NotFound("Report not found".to_string()))
    }

    /// Write access: the owner, or a privileged role. Read follows the
    /// same rule.
    fn authorize(requester: &CurrentUser, report: &DailyReport) -> Result<(), ServiceError> {
        if report.user_id == requester.id || requester.role.is_privileged() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "You do not have access to this report".to_string(),
            ))
        }
    }
}

fn trimmed_summary(summary: Option<String>) -> Option<String> {
    summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    #[instrument(skip(self, req), fields(user = %owner.username, date = %req.report_date))]
    async fn submit(
        &self,
        owner: &CurrentUser,
        req: SubmitReportRequest,
    ) -> Result<ReportResponse, ServiceError> {
        let region = req
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .or_else(|| owner.region.clone())
            .ok_or_else(|| {
                ServiceError::InvalidInput(
                    "region is required when your profile has none".to_string(),
                )
            })?;

        // Pre-check for a friendly error; the unique index catches the
        // concurrent case.
        if self
            .report_repo
            .find_by_owner_and_date(&owner.id, req.report_date)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "A report for this date has already been submitted".to_string(),
            ));
        }

        let report = DailyReport {
            id: None,
            user_id: owner.id,
            report_date: req.report_date,
            region,
            dentists: req.dentists,
            general_practitioners: req.general_practitioners,
            pediatricians: req.pediatricians,
            gynecologists: req.gynecologists,
            dermatologists: req.dermatologists,
            cardiologists: req.cardiologists,
            orthopedists: req.orthopedists,
            pharmacies: req.pharmacies,
            dispensaries: req.dispensaries,
            orders_count: req.orders_count,
            orders_value: req.orders_value,
            summary: trimmed_summary(req.summary),
            created_at: None,
            updated_at: None,
        };

        let inserted = self.report_repo.insert(report).await.map_err(|e| {
            if e.is_duplicate() {
                ServiceError::Conflict(
                    "A report for this date has already been submitted".to_string(),
                )
            } else {
                ServiceError::from(e)
            }
        })?;

        info!("Daily report submitted");
        Ok(ReportResponse::from(inserted))
    }

    #[instrument(skip(self), fields(requester = %requester.username, id = %id))]
    async fn get_report(
        &self,
        requester: &CurrentUser,
        id: &str,
    ) -> Result<ReportResponse, ServiceError> {
        let oid = Self::parse_report_id(id)?;
        let report = self
            .report_repo
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;
        Self::authorize(requester, &report)?;
        Ok(ReportResponse::from(report))
    }

    #[instrument(skip(self, req), fields(requester = %requester.username, id = %id))]
    async fn update_report(
        &self,
        requester: &CurrentUser,
        id: &str,
        req: UpdateReportRequest,
    ) -> Result<ReportResponse, ServiceError> {
        let oid = Self::parse_report_id(id)?;
        let mut report = self
            .report_repo
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;
        Self::authorize(requester, &report)?;

        if let Some(date) = req.report_date {
            if date != report.report_date {
                // Moving to a new date re-runs the one-per-day check.
                if self
                    .report_repo
                    .find_by_owner_and_date(&report.user_id, date)
                    .await?
                    .is_some()
                {
                    return Err(ServiceError::Conflict(
                        "A report for this date has already been submitted".to_string(),
                    ));
                }
                report.report_date = date;
            }
        }
        if let Some(region) = req.region {
            let trimmed = region.trim();
            if trimmed.is_empty() {
                return Err(ServiceError::InvalidInput(
                    "region must not be blank".to_string(),
                ));
            }
            report.region = trimmed.to_string();
        }
        if let Some(v) = req.dentists {
            report.dentists = v;
        }
        if let Some(v) = req.general_practitioners {
            report.general_practitioners = v;
        }
        if let Some(v) = req.pediatricians {
            report.pediatricians = v;
        }
        if let Some(v) = req.gynecologists {
            report.gynecologists = v;
        }
        if let Some(v) = req.dermatologists {
            report.dermatologists = v;
        }
        if let Some(v) = req.cardiologists {
            report.cardiologists = v;
        }
        if let Some(v) = req.orthopedists {
            report.orthopedists = v;
        }
        if let Some(v) = req.pharmacies {
            report.pharmacies = v;
        }
        if let Some(v) = req.dispensaries {
            report.dispensaries = v;
        }
        if let Some(v) = req.orders_count {
            report.orders_count = v;
        }
        if let Some(v) = req.orders_value {
            report.orders_value = v;
        }
        if req.summary.is_some() {
            report.summary = trimmed_summary(req.summary);
        }

        let updated = self.report_repo.update(oid, report).await?;
        info!("Daily report updated");
        Ok(ReportResponse::from(updated))
    }

    #[instrument(skip(self), fields(user = %owner.username))]
    async fn my_reports(
        &self,
        owner: &CurrentUser,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<PaginatedReports, ServiceError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let (reports, total) = self.report_repo.list_by_owner(&owner.id, page, limit).await?;
        Ok(PaginatedReports {
            reports: reports.into_iter().map(ReportResponse::from).collect(),
            pagination: Pagination::new(page, limit, total),
        })
    }
}
