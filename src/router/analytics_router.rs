use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::handler::analytics_handler::{
    monthly_handler, region_performance_handler, team_performance_handler, weekly_handler,
};
use crate::middlewares::auth_middleware::{require_privileged, require_session, AuthState};
use crate::service::analytics_service::AnalyticsServiceImpl;

pub fn analytics_router(service: Arc<AnalyticsServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Personal scopes: any authenticated caller, restricted to their own
    // reports.
    let personal = Router::new()
        .route("/analytics/weekly", get(weekly_handler))
        .route("/analytics/monthly", get(monthly_handler));

    // Team/region scopes: supervisor or admin only.
    let privileged = Router::new()
        .route("/analytics/team-performance", get(team_performance_handler))
        .route(
            "/analytics/region-performance",
            get(region_performance_handler),
        )
        .route_layer(middleware::from_fn(require_privileged));

    personal
        .merge(privileged)
        .route_layer(middleware::from_fn_with_state(auth_state, require_session))
        .with_state(service)
}
