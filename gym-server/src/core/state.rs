use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::user;
use crate::utils::AppError;

/// 服务器状态 - 持有所有共享服务的引用
///
/// 通过 Clone 浅拷贝注入每个请求处理器。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 (Arc 共享) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 手动构造 (测试场景直接传入已迁移的连接池)
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 确保工作目录存在
    /// 2. 打开数据库并应用迁移
    /// 3. 播种默认管理员账号 (空表时)
    /// 4. 构造 JWT 服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        user::ensure_default_admin(&db_service.pool).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self::new(config.clone(), db_service.pool, jwt_service))
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
