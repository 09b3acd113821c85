//! Shared test fixtures: in-memory repositories behind the repository
//! traits, and a fully wired router that runs without any infrastructure.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{routing::get, Router};
use bson::oid::ObjectId;
use chrono::NaiveDate;

use medrep_backend::middlewares::auth_middleware::AuthState;
use medrep_backend::config::JwtConfig;
use medrep_backend::model::report::DailyReport;
use medrep_backend::model::user::{User, UserRole};
use medrep_backend::repository::report_repo::ReportRepository;
use medrep_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use medrep_backend::repository::user_repo::UserRepository;
use medrep_backend::router::analytics_router::analytics_router;
use medrep_backend::router::auth_router::auth_router;
use medrep_backend::router::report_router::report_router;
use medrep_backend::router::user_router::user_router;
use medrep_backend::service::analytics_service::AnalyticsServiceImpl;
use medrep_backend::service::auth_service::AuthServiceImpl;
use medrep_backend::service::report_service::ReportServiceImpl;
use medrep_backend::service::user_service::UserServiceImpl;
use medrep_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        // Emulates the unique username/email indexes.
        if users.iter().any(|u| {
            u.username.eq_ignore_ascii_case(&user.username)
                || u.email.eq_ignore_ascii_case(&user.email)
        }) {
            return Err(RepositoryError::already_exists("Duplicate key: E11000"));
        }
        user.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: ObjectId, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        let Some(slot) = users.iter_mut().find(|u| u.id == Some(id)) else {
            return Err(RepositoryError::not_found("No user found"));
        };
        user.id = Some(id);
        user.updated_at = Some(chrono::Local::now().to_rfc3339());
        *slot = user.clone();
        Ok(user)
    }

    async fn set_active(&self, id: ObjectId, active: bool) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        let Some(slot) = users.iter_mut().find(|u| u.id == Some(id)) else {
            return Err(RepositoryError::not_found("No user found"));
        };
        slot.is_active = active;
        Ok(slot.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(
        &self,
        role: Option<UserRole>,
        active: Option<bool>,
    ) -> RepositoryResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .filter(|u| active.map_or(true, |a| u.is_active == a))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryReportRepo {
    pub reports: Mutex<Vec<DailyReport>>,
}

#[async_trait]
impl ReportRepository for InMemoryReportRepo {
    async fn insert(&self, mut report: DailyReport) -> RepositoryResult<DailyReport> {
        let mut reports = self.reports.lock().unwrap();
        // Emulates the unique (user_id, report_date) index.
        if reports
            .iter()
            .any(|r| r.user_id == report.user_id && r.report_date == report.report_date)
        {
            return Err(RepositoryError::already_exists("Duplicate key: E11000"));
        }
        report.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        report.created_at = Some(now.clone());
        report.updated_at = Some(now);
        reports.push(report.clone());
        Ok(report)
    }

    async fn update(&self, id: ObjectId, mut report: DailyReport) -> RepositoryResult<DailyReport> {
        let mut reports = self.reports.lock().unwrap();
        let Some(slot) = reports.iter_mut().find(|r| r.id == Some(id)) else {
            return Err(RepositoryError::not_found("No report found"));
        };
        report.id = Some(id);
        report.updated_at = Some(chrono::Local::now().to_rfc3339());
        *slot = report.clone();
        Ok(report)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<DailyReport>> {
        let reports = self.reports.lock().unwrap();
        Ok(reports.iter().find(|r| r.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_owner_and_date(
        &self,
        user_id: &ObjectId,
        date: NaiveDate,
    ) -> RepositoryResult<Option<DailyReport>> {
        let reports = self.reports.lock().unwrap();
        Ok(reports
            .iter()
            .find(|r| &r.user_id == user_id && r.report_date == date)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        user_id: &ObjectId,
        page: u64,
        limit: u64,
    ) -> RepositoryResult<(Vec<DailyReport>, u64)> {
        let reports = self.reports.lock().unwrap();
        let mut mine: Vec<DailyReport> = reports
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.report_date.cmp(&a.report_date));
        let total = mine.len() as u64;
        let page = mine
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_owner_since(
        &self,
        user_id: &ObjectId,
        since: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<DailyReport>> {
        let reports = self.reports.lock().unwrap();
        Ok(reports
            .iter()
            .filter(|r| &r.user_id == user_id)
            .filter(|r| since.map_or(true, |d| r.report_date >= d))
            .cloned()
            .collect())
    }

    async fn find_since(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyReport>> {
        let reports = self.reports.lock().unwrap();
        Ok(reports
            .iter()
            .filter(|r| since.map_or(true, |d| r.report_date >= d))
            .cloned()
            .collect())
    }
}

/// A fully wired API router over in-memory repositories.
pub struct TestBackend {
    pub router: Router,
    pub user_repo: Arc<InMemoryUserRepo>,
    pub report_repo: Arc<InMemoryReportRepo>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl TestBackend {
    pub fn new() -> Self {
        let user_repo = Arc::new(InMemoryUserRepo::default());
        let report_repo = Arc::new(InMemoryReportRepo::default());
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));

        let user_repo_dyn: Arc<dyn UserRepository> = user_repo.clone();
        let report_repo_dyn: Arc<dyn ReportRepository> = report_repo.clone();

        let auth_service = Arc::new(AuthServiceImpl::new(user_repo_dyn.clone(), jwt_utils.clone()));
        let report_service = Arc::new(ReportServiceImpl::new(report_repo_dyn.clone()));
        let analytics_service = Arc::new(AnalyticsServiceImpl::new(
            report_repo_dyn.clone(),
            user_repo_dyn.clone(),
        ));
        let user_service = Arc::new(UserServiceImpl::new(user_repo_dyn.clone()));

        let auth_state = Arc::new(AuthState {
            jwt_utils: jwt_utils.clone(),
            user_repo: user_repo_dyn,
        });

        let api = Router::new()
            .merge(auth_router(auth_service, auth_state.clone()))
            .merge(report_router(report_service, auth_state.clone()))
            .merge(analytics_router(analytics_service, auth_state.clone()))
            .merge(user_router(user_service, auth_state));

        let router = Router::new()
            .nest("/api", api)
            .route("/health", get(|| async { "OK" }));

        TestBackend {
            router,
            user_repo,
            report_repo,
            jwt_utils,
        }
    }

    /// Seed a user directly into the store. The password hash is left
    /// empty; token-based tests never verify a password.
    pub async fn seed_user(
        &self,
        username: &str,
        role: UserRole,
        region: Option<&str>,
        active: bool,
    ) -> User {
        let user = User {
            id: None,
            username: username.to_string(),
            name: format!("Test {}", username),
            email: format!("{}@example.com", username),
            password_hash: String::new(),
            role,
            region: region.map(str::to_string),
            is_active: active,
            created_at: None,
            updated_at: None,
        };
        self.user_repo.insert(user).await.unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.jwt_utils.generate_token(user).unwrap()
    }
}

pub fn make_report(user_id: ObjectId, date: NaiveDate, region: &str) -> DailyReport {
    DailyReport {
        id: None,
        user_id,
        report_date: date,
        region: region.to_string(),
        dentists: 0,
        general_practitioners: 0,
        pediatricians: 0,
        gynecologists: 0,
        dermatologists: 0,
        cardiologists: 0,
        orthopedists: 0,
        pharmacies: 0,
        dispensaries: 0,
        orders_count: 0,
        orders_value: 0.0,
        summary: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    }
}

pub async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
