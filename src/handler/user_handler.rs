use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::auth_dto::{RegisterRequest, UpdateUserRequest, UserListQuery};
use crate::dto::response::ApiResponse;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;
use crate::util::extract::ApiJson;

pub async fn list_users_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = service.list_users(query.role, query.active).await?;
    Ok(Json(ApiResponse::ok(users)))
}

pub async fn get_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.get_user(&id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

pub async fn create_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::from_validation(&e));
    }
    let user = service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

pub async fn update_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::from_validation(&e));
    }
    let user = service.update_user(&id, payload).await?;
    Ok(Json(ApiResponse::ok(user)))
}

pub async fn activate_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.set_user_active(&id, true).await?;
    Ok(Json(ApiResponse::ok_with_message("User activated", user)))
}

pub async fn deactivate_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.set_user_active(&id, false).await?;
    Ok(Json(ApiResponse::ok_with_message("User deactivated", user)))
}
