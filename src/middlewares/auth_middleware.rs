use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use bson::oid::ObjectId;
use tracing::warn;

use crate::model::user::UserRole;
use crate::repository::user_repo::UserRepository;
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_repo: Arc<dyn UserRepository>,
}

/// The live, password-stripped identity attached to every verified
/// request. Built from the stored user record, not from token claims, so
/// role and active-status changes take effect immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: ObjectId,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub region: Option<String>,
}

/// Session verification: validate the bearer token, then re-resolve the
/// user from the store on every request. No verification results are
/// cached.
pub async fn require_session(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| HandlerError::unauthorized("Missing authorization header"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| HandlerError::unauthorized("Invalid authorization header"))?;

    let claims = state
        .jwt_utils
        .validate_token(&token)
        .map_err(|_| HandlerError::unauthorized("Invalid or expired token"))?;

    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::unauthorized("Invalid or expired token"))?;

    let user = state
        .user_repo
        .find_by_id(&user_id)
        .await
        .map_err(|e| {
            warn!("Session verification store lookup failed: {}", e);
            HandlerError::unauthorized("Could not verify session")
        })?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            warn!("Stale identity rejected for user: {}", claims.sub);
            HandlerError::unauthorized("User account is inactive or no longer exists")
        })?;

    let current = CurrentUser {
        id: user_id,
        username: user.username,
        name: user.name,
        email: user.email,
        role: user.role,
        region: user.region,
    };
    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}

/// Layered after `require_session` on supervisor/admin-only routes.
pub async fn require_privileged(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| HandlerError::unauthorized("Missing session"))?;

    if !current.role.is_privileged() {
        return Err(HandlerError::forbidden(
            "Supervisor or admin role required",
        ));
    }

    Ok(next.run(req).await)
}
