use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, RegisterRequest};
use crate::dto::response::ApiResponse;
use crate::service::auth_service::{AuthService, AuthServiceImpl};
use crate::util::error::HandlerError;
use crate::util::extract::ApiJson;

pub async fn login_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::from_validation(&e));
    }
    let res = service.login(&payload.username, &payload.password).await?;
    Ok(Json(ApiResponse::ok(res)))
}

/// Stateless: the client discards its token. There is no server-side
/// revocation list.
pub async fn logout_handler() -> impl IntoResponse {
    Json(ApiResponse::message_only("Logged out"))
}

pub async fn register_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::from_validation(&e));
    }
    let profile = service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}
