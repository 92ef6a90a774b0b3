//! User Repository

use super::{RepoError, RepoResult};
use crate::db::models::User;
use shared::models::UserRole;
use shared::util::now_millis;
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, name, username, password_hash, role, created_at FROM user";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(
    pool: &SqlitePool,
    name: &str,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> RepoResult<User> {
    let now = now_millis();
    let id = shared::util::snowflake_id();
    let result = sqlx::query(
        "INSERT INTO user (id, name, username, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(username)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .execute(pool)
    .await;

    if let Err(e) = result {
        return match RepoError::from(e) {
            RepoError::Duplicate(_) => Err(RepoError::Duplicate(format!(
                "Username '{username}' already exists"
            ))),
            other => Err(other),
        };
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Seed the default admin account on a fresh installation.
///
/// Runs at startup; does nothing once any account exists.
pub async fn ensure_default_admin(pool: &SqlitePool) -> RepoResult<()> {
    if count(pool).await? > 0 {
        return Ok(());
    }

    let password_hash = User::hash_password("admin123")
        .map_err(|e| RepoError::Database(format!("Failed to hash default password: {e}")))?;
    create(pool, "Admin User", "admin", &password_hash, UserRole::Admin).await?;

    tracing::warn!(
        username = "admin",
        "Seeded default admin account - change the password after first login"
    );
    Ok(())
}
