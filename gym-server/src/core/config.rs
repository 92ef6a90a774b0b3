use std::path::PathBuf;

use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/gym/server | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 5001 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/gym.db | SQLite 数据库文件 |
/// | GYM_TIMEZONE | UTC | 设施时区 (IANA 名称，决定"今天"的边界) |
/// | ENVIRONMENT | development | 运行环境 |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | - | JWT 配置 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/gym GYM_TIMEZONE=Asia/Manila cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径 (默认 work_dir/gym.db)
    pub database_path: Option<String>,
    /// 设施时区：签到"今天"、月营收统计均以此换算
    pub timezone: Tz,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        let timezone = match std::env::var("GYM_TIMEZONE") {
            Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(timezone = %name, "Unknown GYM_TIMEZONE, falling back to UTC");
                Tz::UTC
            }),
            Err(_) => Tz::UTC,
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/gym/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),
            database_path: std::env::var("DATABASE_PATH").ok(),
            timezone,
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置，常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("gym.db"),
        }
    }

    /// 确保工作目录存在
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
