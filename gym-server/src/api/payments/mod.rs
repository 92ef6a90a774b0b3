//! Payment API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/payments",
        Router::new().route("/", post(handler::create).get(handler::list)),
    )
}
