//! Gym front-desk management server
//!
//! Member registry, attendance check-in/out, payment-driven renewals and a
//! dashboard snapshot, gated behind role-based JWT login.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::{AppError, AppResult};

/// 进程启动环境设置：加载 .env、初始化日志
pub fn setup_environment() {
    dotenv::dotenv().ok();
    utils::logger::init_logger();
}
