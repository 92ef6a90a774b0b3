//! Attendance Repository
//!
//! Open session = `check_out_time IS NULL`. The duplicate-session rule is
//! scoped to the facility-timezone day: callers pass today's midnight as
//! `day_start`.

use super::{RepoError, RepoResult};
use shared::models::{Attendance, AttendanceWithMember};
use shared::util::now_millis;
use sqlx::SqlitePool;

const ATTENDANCE_SELECT: &str = "SELECT id, member_id, check_in_time, check_out_time, staff_name, created_at FROM attendance";

// LEFT JOIN keeps history visible when the member row has been deleted
const ATTENDANCE_WITH_MEMBER_SELECT: &str = "SELECT a.id, a.member_id, COALESCE(m.name, '(deleted member)') AS member_name, COALESCE(m.contact, '') AS member_contact, a.check_in_time, a.check_out_time, a.staff_name, a.created_at FROM attendance a LEFT JOIN member m ON a.member_id = m.id";

pub async fn find_open_since(
    pool: &SqlitePool,
    member_id: i64,
    day_start: i64,
) -> RepoResult<Option<Attendance>> {
    let sql = format!(
        "{ATTENDANCE_SELECT} WHERE member_id = ? AND check_in_time >= ? AND check_out_time IS NULL LIMIT 1"
    );
    let row = sqlx::query_as::<_, Attendance>(&sql)
        .bind(member_id)
        .bind(day_start)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn check_in(
    pool: &SqlitePool,
    member_id: i64,
    staff_name: &str,
    day_start: i64,
) -> RepoResult<Attendance> {
    // At most one open session per member per day
    if find_open_since(pool, member_id, day_start).await?.is_some() {
        return Err(RepoError::Duplicate("Member is already checked in".into()));
    }

    let now = now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO attendance (id, member_id, check_in_time, check_out_time, staff_name, created_at) VALUES (?, ?, ?, NULL, ?, ?)",
    )
    .bind(id)
    .bind(member_id)
    .bind(now)
    .bind(staff_name)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attendance record".into()))
}

pub async fn check_out(
    pool: &SqlitePool,
    member_id: i64,
    day_start: i64,
) -> RepoResult<Attendance> {
    let open = find_open_since(pool, member_id, day_start)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound("No active check-in found for this member".into())
        })?;

    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE attendance SET check_out_time = ? WHERE id = ? AND check_out_time IS NULL",
    )
    .bind(now)
    .bind(open.id)
    .execute(pool)
    .await?;

    // Lost a race with another station closing the same session
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(
            "No active check-in found for this member".into(),
        ));
    }

    find_by_id(pool, open.id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to load attendance record".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Attendance>> {
    let sql = format!("{ATTENDANCE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Attendance>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Filtered listing, newest first, capped. `window` is a `[start, end)`
/// millis range for a single calendar day.
pub async fn find_by_filter(
    pool: &SqlitePool,
    member_id: Option<i64>,
    window: Option<(i64, i64)>,
    limit: i64,
) -> RepoResult<Vec<AttendanceWithMember>> {
    let mut sql = format!("{ATTENDANCE_WITH_MEMBER_SELECT} WHERE 1 = 1");
    if member_id.is_some() {
        sql.push_str(" AND a.member_id = ?");
    }
    if window.is_some() {
        sql.push_str(" AND a.check_in_time >= ? AND a.check_in_time < ?");
    }
    sql.push_str(" ORDER BY a.check_in_time DESC LIMIT ?");

    let mut query = sqlx::query_as::<_, AttendanceWithMember>(&sql);
    if let Some(id) = member_id {
        query = query.bind(id);
    }
    if let Some((start, end)) = window {
        query = query.bind(start).bind(end);
    }
    let rows = query.bind(limit).fetch_all(pool).await?;
    Ok(rows)
}

/// All records from `day_start` onward, newest first, uncapped
pub async fn find_since(pool: &SqlitePool, day_start: i64) -> RepoResult<Vec<AttendanceWithMember>> {
    let sql = format!(
        "{ATTENDANCE_WITH_MEMBER_SELECT} WHERE a.check_in_time >= ? ORDER BY a.check_in_time DESC"
    );
    let rows = sqlx::query_as::<_, AttendanceWithMember>(&sql)
        .bind(day_start)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count_since(pool: &SqlitePool, day_start: i64) -> RepoResult<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE check_in_time >= ?")
            .bind(day_start)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn count_open_since(pool: &SqlitePool, day_start: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE check_in_time >= ? AND check_out_time IS NULL",
    )
    .bind(day_start)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
