pub mod aggregation;
pub mod analytics_service;
pub mod auth_service;
pub mod report_service;
pub mod user_service;
