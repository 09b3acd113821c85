pub mod analytics_dto;
pub mod auth_dto;
pub mod report_dto;
pub mod response;

pub use response::{ApiResponse, Pagination};
