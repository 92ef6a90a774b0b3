//! Settings API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new().route("/prices", get(handler::get_prices));

    let manage_routes = Router::new()
        .route("/prices", put(handler::update_prices))
        .layer(middleware::from_fn(require_admin));

    Router::new().nest("/api/settings", read_routes.merge(manage_routes))
}
