pub mod report_repo;
pub mod repository_error;
pub mod user_repo;
