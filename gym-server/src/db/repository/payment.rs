//! Payment Repository
//!
//! Payment rows are append-only. Recording a payment also rewrites the
//! member's membership window; both writes share one transaction so a
//! failed insert cannot leave an extended membership without payment
//! evidence.

use super::{RepoError, RepoResult};
use shared::models::{MembershipPlan, MembershipStatus, Payment, PaymentWithMember};
use shared::util::{DAY_MILLIS, now_millis};
use sqlx::SqlitePool;

const PAYMENT_SELECT: &str = "SELECT id, member_id, amount, payment_date, payment_method, membership_plan, staff_name, created_at FROM payment";

// LEFT JOIN keeps history visible when the member row has been deleted
const PAYMENT_WITH_MEMBER_SELECT: &str = "SELECT p.id, p.member_id, COALESCE(m.name, '(deleted member)') AS member_name, p.amount, p.payment_date, p.payment_method, p.membership_plan, p.staff_name, p.created_at FROM payment p LEFT JOIN member m ON p.member_id = m.id";

/// Record a payment and renew the member's window: `start_date = now`,
/// `end_date = now + plan duration`, status Active unconditionally.
pub async fn record(
    pool: &SqlitePool,
    member_id: i64,
    amount: f64,
    plan: MembershipPlan,
    payment_method: &str,
    staff_name: &str,
) -> RepoResult<Payment> {
    let now = now_millis();
    let new_end_date = now + plan.duration_days() * DAY_MILLIS;
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE member SET membership_type = ?, start_date = ?, end_date = ?, status = ?, updated_at = ? WHERE id = ?",
    )
    .bind(plan.membership_type().as_str())
    .bind(now)
    .bind(new_end_date)
    .bind(MembershipStatus::Active.as_str())
    .bind(now)
    .bind(member_id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {member_id} not found")));
    }

    sqlx::query(
        "INSERT INTO payment (id, member_id, amount, payment_date, payment_method, membership_plan, staff_name, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(member_id)
    .bind(amount)
    .bind(now)
    .bind(payment_method)
    .bind(plan.as_str())
    .bind(staff_name)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create payment record".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Payment>> {
    let sql = format!("{PAYMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Payment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Listing, newest first, capped
pub async fn find_by_filter(
    pool: &SqlitePool,
    member_id: Option<i64>,
    limit: i64,
) -> RepoResult<Vec<PaymentWithMember>> {
    let mut sql = PAYMENT_WITH_MEMBER_SELECT.to_string();
    if member_id.is_some() {
        sql.push_str(" WHERE p.member_id = ?");
    }
    sql.push_str(" ORDER BY p.payment_date DESC LIMIT ?");

    let mut query = sqlx::query_as::<_, PaymentWithMember>(&sql);
    if let Some(id) = member_id {
        query = query.bind(id);
    }
    let rows = query.bind(limit).fetch_all(pool).await?;
    Ok(rows)
}

/// Revenue from `since` (inclusive) onward
pub async fn sum_since(pool: &SqlitePool, since: i64) -> RepoResult<f64> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(amount), 0.0) FROM payment WHERE payment_date >= ?",
    )
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
