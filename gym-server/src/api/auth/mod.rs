//! Auth API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 登录由认证中间件放行；/me 需要登录；注册仅限管理员
    let base_routes = Router::new()
        .route("/login", post(handler::login))
        .route("/me", get(handler::me));

    let admin_routes = Router::new()
        .route("/register", post(handler::register))
        .layer(middleware::from_fn(require_admin));

    Router::new().nest("/api/auth", base_routes.merge(admin_routes))
}
