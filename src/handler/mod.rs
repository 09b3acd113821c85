pub mod analytics_handler;
pub mod auth_handler;
pub mod report_handler;
pub mod user_handler;
