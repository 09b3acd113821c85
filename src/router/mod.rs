pub mod analytics_router;
pub mod auth_router;
pub mod report_router;
pub mod user_router;
