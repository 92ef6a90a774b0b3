//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/auth/login` (登录接口)
/// - `/api/health` (健康检查)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // 公共 API 路由跳过认证
    let is_public_api_route = path == "/api/auth/login" || path == "/api/health";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => {
            JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?
        }
        None => {
            tracing::warn!(uri = %req.uri(), "Request without authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    // 验证令牌并解析用户上下文
    let user = jwt_service
        .validate_token(token)
        .and_then(CurrentUser::try_from)
        .map_err(|e| {
            tracing::warn!(uri = %req.uri(), error = %e, "Authentication failed");
            match e {
                JwtError::ExpiredToken => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 管理员中间件 - 要求 Admin 角色
///
/// 必须在 [`require_auth`] 之后执行 (依赖注入的 CurrentUser)。
///
/// # 错误
///
/// 非管理员返回 403 Forbidden
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if !user.is_admin() {
        tracing::warn!(
            user_id = user.id,
            username = %user.username,
            "Admin-only route denied"
        );
        return Err(AppError::forbidden("Admin role required"));
    }

    Ok(next.run(req).await)
}
