use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};

use crate::dto::analytics_dto::TeamPerformanceQuery;
use crate::dto::response::ApiResponse;
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::analytics_service::{AnalyticsService, AnalyticsServiceImpl};
use crate::util::error::HandlerError;

pub async fn weekly_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let rows = service.personal_weekly(&current).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

pub async fn monthly_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let rows = service.personal_monthly(&current).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

pub async fn team_performance_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
    Query(query): Query<TeamPerformanceQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let rows = service.team_performance(query.period.as_deref()).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

pub async fn region_performance_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let rows = service.region_performance().await?;
    Ok(Json(ApiResponse::ok(rows)))
}
