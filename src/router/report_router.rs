use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handler::report_handler::{
    get_report_handler, my_reports_handler, submit_report_handler, update_report_handler,
};
use crate::middlewares::auth_middleware::{require_session, AuthState};
use crate::service::report_service::ReportServiceImpl;

pub fn report_router(service: Arc<ReportServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/reports/daily", post(submit_report_handler))
        .route("/reports/my-reports", get(my_reports_handler))
        .route("/reports/:id", get(get_report_handler))
        .route("/reports/:id", put(update_report_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_session))
        .with_state(service)
}
