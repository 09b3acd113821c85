use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::{error, info, warn};

use crate::config::{AdminUserConfig, AppConfig, JwtConfig, MongoConfig};
use crate::dto::auth_dto::RegisterRequest;
use crate::middlewares::auth_middleware::AuthState;
use crate::model::user::UserRole;
use crate::repository::report_repo::{MongoReportRepository, ReportRepository};
use crate::repository::user_repo::{MongoUserRepository, UserRepository};
use crate::router::analytics_router::analytics_router;
use crate::router::auth_router::auth_router;
use crate::router::report_router::report_router;
use crate::router::user_router::user_router;
use crate::service::analytics_service::AnalyticsServiceImpl;
use crate::service::auth_service::AuthServiceImpl;
use crate::service::report_service::ReportServiceImpl;
use crate::service::user_service::{provision_user, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;

pub struct App {
    config: AppConfig,
    router: Router,
    user_repo: Arc<dyn UserRepository>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");

        // One client for the whole process; every repository shares it.
        let db = mongo_config.connect().await.expect("MongoDB connection error");

        let user_repo = MongoUserRepository::new(&db, &mongo_config.users_collection);
        let report_repo = MongoReportRepository::new(&db, &mongo_config.reports_collection);

        // The unique indexes are load-bearing: they close the duplicate
        // submission race the application pre-checks cannot.
        user_repo.ensure_indexes().await.expect("User index error");
        report_repo
            .ensure_indexes()
            .await
            .expect("Report index error");

        let user_repo: Arc<dyn UserRepository> = Arc::new(user_repo);
        let report_repo: Arc<dyn ReportRepository> = Arc::new(report_repo);
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));

        let auth_service = Arc::new(AuthServiceImpl::new(user_repo.clone(), jwt_utils.clone()));
        let report_service = Arc::new(ReportServiceImpl::new(report_repo.clone()));
        let analytics_service = Arc::new(AnalyticsServiceImpl::new(
            report_repo.clone(),
            user_repo.clone(),
        ));
        let user_service = Arc::new(UserServiceImpl::new(user_repo.clone()));

        let auth_state = Arc::new(AuthState {
            jwt_utils: jwt_utils.clone(),
            user_repo: user_repo.clone(),
        });

        let api = Router::new()
            .merge(auth_router(auth_service, auth_state.clone()))
            .merge(report_router(report_service, auth_state.clone()))
            .merge(analytics_router(analytics_service, auth_state.clone()))
            .merge(user_router(user_service, auth_state));

        let router = Router::new()
            .nest("/api", api)
            .route("/health", get(|| async { "OK" }));

        let app = App {
            config,
            router,
            user_repo,
        };
        app.create_first_admin().await;
        app
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(
            self.config.host.parse().expect("Invalid host"),
            self.config.port,
        );
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }

    /// Seed the first admin account from env config when none exists yet.
    async fn create_first_admin(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded, skipping seeding: {e}");
                return;
            }
        };

        match self.user_repo.find_by_username(&admin_conf.username).await {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        let request = RegisterRequest {
            username: admin_conf.username,
            password: admin_conf.password,
            name: admin_conf.name,
            email: admin_conf.email,
            role: Some(UserRole::Admin),
            region: admin_conf.region,
        };
        match provision_user(self.user_repo.as_ref(), request).await {
            Ok(user) => info!("Seeded first admin user: {}", user.username),
            Err(e) => error!("Failed to seed admin user: {e}"),
        }
    }
}
