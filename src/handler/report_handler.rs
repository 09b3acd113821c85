use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::dto::report_dto::{ReportListQuery, SubmitReportRequest, UpdateReportRequest};
use crate::dto::response::ApiResponse;
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::report_service::{ReportService, ReportServiceImpl};
use crate::util::error::HandlerError;
use crate::util::extract::ApiJson;

pub async fn submit_report_handler(
    State(service): State<Arc<ReportServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<SubmitReportRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::from_validation(&e));
    }
    let report = service.submit(&current, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message("Report submitted", report)),
    ))
}

pub async fn my_reports_handler(
    State(service): State<Arc<ReportServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ReportListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = service.my_reports(&current, query.page, query.limit).await?;
    Ok(Json(ApiResponse::ok(page)))
}

pub async fn get_report_handler(
    State(service): State<Arc<ReportServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let report = service.get_report(&current, &id).await?;
    Ok(Json(ApiResponse::ok(report)))
}

pub async fn update_report_handler(
    State(service): State<Arc<ReportServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateReportRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::from_validation(&e));
    }
    let report = service.update_report(&current, &id, payload).await?;
    Ok(Json(ApiResponse::ok_with_message("Report updated", report)))
}
