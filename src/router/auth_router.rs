use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use crate::handler::auth_handler::{login_handler, logout_handler, register_handler};
use crate::middlewares::auth_middleware::{require_session, AuthState};
use crate::service::auth_service::AuthServiceImpl;

pub fn auth_router(service: Arc<AuthServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler));

    // Logout only acknowledges; it still requires a valid session so a
    // dropped token cannot probe the endpoint.
    let protected = Router::new()
        .route("/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_session));

    public.merge(protected).with_state(service)
}
