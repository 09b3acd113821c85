use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handler::user_handler::{
    activate_user_handler, create_user_handler, deactivate_user_handler, get_user_handler,
    list_users_handler, update_user_handler,
};
use crate::middlewares::auth_middleware::{require_privileged, require_session, AuthState};
use crate::service::user_service::UserServiceImpl;

/// User management is supervisor/admin only in its entirety.
pub fn user_router(service: Arc<UserServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/users", get(list_users_handler))
        .route("/users", post(create_user_handler))
        .route("/users/:id", get(get_user_handler))
        .route("/users/:id", put(update_user_handler))
        .route("/users/:id/activate", put(activate_user_handler))
        .route("/users/:id/deactivate", put(deactivate_user_handler))
        .route_layer(middleware::from_fn(require_privileged))
        .route_layer(middleware::from_fn_with_state(auth_state, require_session))
        .with_state(service)
}
