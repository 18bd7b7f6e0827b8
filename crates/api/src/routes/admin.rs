use axum::middleware::from_fn_with_state;
use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::middleware::rate_limit::{rate_limit, RouteClass};
use crate::state::AppState;

/// Mount `/api/admin` routes (api-class rate limit; permission checks live
/// in the handler extractors).
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/logs", get(admin::get_logs))
        .route("/users/{id}/role", put(admin::update_role))
        .layer(from_fn_with_state((state, RouteClass::Api), rate_limit))
}
