//! 认证模块
//!
//! JWT issuing/validation plus the axum middleware that gates the API.

mod jwt;
mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
