use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::NaiveDate;
use futures::stream::StreamExt;
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::IndexModel;
use tracing::{error, info};

use crate::model::report::DailyReport;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, report: DailyReport) -> RepositoryResult<DailyReport>;
    async fn update(&self, id: ObjectId, report: DailyReport) -> RepositoryResult<DailyReport>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<DailyReport>>;
    /// Duplicate pre-check for the one-report-per-day rule. The unique
    /// index remains the authoritative guard under concurrent submits.
    async fn find_by_owner_and_date(
        &self,
        user_id: &ObjectId,
        date: NaiveDate,
    ) -> RepositoryResult<Option<DailyReport>>;
    /// Owner's reports, date-descending, paginated. Returns the page plus
    /// the total matching count.
    async fn list_by_owner(
        &self,
        user_id: &ObjectId,
        page: u64,
        limit: u64,
    ) -> RepositoryResult<(Vec<DailyReport>, u64)>;
    /// Owner's reports on or after `since` (all-time when `None`).
    async fn find_by_owner_since(
        &self,
        user_id: &ObjectId,
        since: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<DailyReport>>;
    /// Every report on or after `since` (all-time when `None`).
    async fn find_since(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyReport>>;
}

pub struct MongoReportRepository {
    collection: mongodb::Collection<DailyReport>,
}

impl MongoReportRepository {
    pub fn new(db: &mongodb::Database, collection_name: &str) -> Self {
        MongoReportRepository {
            collection: db.collection::<DailyReport>(collection_name),
        }
    }

    /// Create the unique (user_id, report_date) index. Called once at
    /// startup; this is what actually closes the check-then-insert race.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "report_date": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        info!("Report indexes ensured");
        Ok(())
    }

    async fn collect(
        &self,
        filter: bson::Document,
        options: Option<FindOptions>,
    ) -> RepositoryResult<Vec<DailyReport>> {
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query reports: {}", e)))?;
        let mut reports = Vec::new();
        while let Some(report) = cursor.next().await {
            match report {
                Ok(r) => reports.push(r),
                Err(e) => {
                    error!("Failed to deserialize report: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize report: {}",
                        e
                    )));
                }
            }
        }
        Ok(reports)
    }

    fn since_filter(since: Option<NaiveDate>) -> bson::Document {
        // report_date is stored as an ISO "YYYY-MM-DD" string, which
        // compares correctly in lexicographic order.
        match since {
            Some(date) => doc! { "report_date": { "$gte": date.to_string() } },
            None => bson::Document::new(),
        }
    }
}

#[async_trait]
impl ReportRepository for MongoReportRepository {
    #[tracing::instrument(skip(self, report), fields(user_id = %report.user_id, date = %report.report_date))]
    async fn insert(&self, report: DailyReport) -> RepositoryResult<DailyReport> {
        let mut new_report = report;
        new_report.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        new_report.created_at = Some(now.clone());
        new_report.updated_at = Some(now);

        match self.collection.insert_one(new_report.clone(), None).await {
            Ok(_) => {
                info!("Daily report created");
                Ok(new_report)
            }
            Err(e) => {
                // E11000 on the (user_id, report_date) index becomes
                // AlreadyExists here.
                error!("Failed to insert report: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, report), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut report: DailyReport) -> RepositoryResult<DailyReport> {
        report.updated_at = Some(chrono::Local::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut document = bson::to_document(&report).map_err(|e| {
            RepositoryError::serialization(format!("Failed to serialize report: {}", e))
        })?;
        document.remove("_id");
        let update = doc! { "$set": document };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(report),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No report found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update report: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<DailyReport>> {
        let report = self
            .collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find report: {}", e)))?;
        Ok(report)
    }

    async fn find_by_owner_and_date(
        &self,
        user_id: &ObjectId,
        date: NaiveDate,
    ) -> RepositoryResult<Option<DailyReport>> {
        let filter = doc! { "user_id": user_id, "report_date": date.to_string() };
        let report = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find report: {}", e)))?;
        Ok(report)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, page = page, limit = limit))]
    async fn list_by_owner(
        &self,
        user_id: &ObjectId,
        page: u64,
        limit: u64,
    ) -> RepositoryResult<(Vec<DailyReport>, u64)> {
        let filter = doc! { "user_id": user_id };
        let total = self
            .collection
            .count_documents(filter.clone(), None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count reports: {}", e)))?;

        let options = FindOptions::builder()
            .sort(doc! { "report_date": -1 })
            .skip(page.saturating_sub(1) * limit)
            .limit(limit as i64)
            .build();
        let reports = self.collect(filter, Some(options)).await?;
        Ok((reports, total))
    }

    async fn find_by_owner_since(
        &self,
        user_id: &ObjectId,
        since: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<DailyReport>> {
        let mut filter = Self::since_filter(since);
        filter.insert("user_id", user_id);
        self.collect(filter, None).await
    }

    async fn find_since(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyReport>> {
        self.collect(Self::since_filter(since), None).await
    }
}
