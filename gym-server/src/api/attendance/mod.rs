//! Attendance API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/attendance",
        Router::new()
            .route("/checkin", post(handler::check_in))
            .route("/checkout", post(handler::check_out))
            .route("/", get(handler::list))
            .route("/today", get(handler::list_today)),
    )
}
