use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::middleware::rate_limit::{rate_limit, RouteClass};
use crate::state::AppState;

/// Mount `/api/auth` routes.
///
/// The whole subtree sits behind the strict auth-class rate limit (5
/// requests per client per hour), since these endpoints are the ones worth
/// brute-forcing.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/signin", post(auth::signin))
        .route("/signup", post(auth::signup))
        .route("/validate", get(auth::validate))
        .route("/signout", post(auth::signout))
        .route("/reset-password", post(auth::reset_password))
        .layer(from_fn_with_state((state, RouteClass::Auth), rate_limit))
}
