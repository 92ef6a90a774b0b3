//! Member Repository
//!
//! Every function that returns members refreshes `status` from `end_date`
//! before handing the rows out; the stored column is only a snapshot.

use super::{RepoError, RepoResult};
use shared::models::{
    Member, MemberCreate, MemberUpdate, MembershipStatus, MembershipType, generate_member_code,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

const MEMBER_SELECT: &str = "SELECT id, member_code, name, contact, email, age, date_of_birth, gender, address, emergency_contact_name, emergency_contact_phone, emergency_contact_relationship, photo_url, id_number, membership_type, start_date, end_date, status, notes, created_at, updated_at FROM member";

/// Attempts at generating a unique member code before giving up. The 4-digit
/// random suffix can collide within a month; the UNIQUE constraint catches
/// it and we redraw.
const CODE_RETRIES: u32 = 5;

fn refresh_status(member: &mut Member, now: i64) {
    member.status = MembershipStatus::derive(member.end_date, now);
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Member>> {
    let sql = format!("{MEMBER_SELECT} ORDER BY created_at DESC");
    let mut rows = sqlx::query_as::<_, Member>(&sql).fetch_all(pool).await?;
    let now = now_millis();
    for member in &mut rows {
        refresh_status(member, now);
    }
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|mut m| {
        refresh_status(&mut m, now_millis());
        m
    }))
}

pub async fn create(
    pool: &SqlitePool,
    data: MemberCreate,
    membership_type: MembershipType,
) -> RepoResult<Member> {
    let now = now_millis();
    let id = shared::util::snowflake_id();
    let status = MembershipStatus::derive(data.end_date, now);

    let mut attempts = 0;
    loop {
        let member_code = generate_member_code(now);
        let result = sqlx::query(
            "INSERT INTO member (id, member_code, name, contact, email, age, date_of_birth, gender, address, emergency_contact_name, emergency_contact_phone, emergency_contact_relationship, photo_url, id_number, membership_type, start_date, end_date, status, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&member_code)
        .bind(&data.name)
        .bind(&data.contact)
        .bind(&data.email)
        .bind(data.age)
        .bind(&data.date_of_birth)
        .bind(&data.gender)
        .bind(&data.address)
        .bind(&data.emergency_contact_name)
        .bind(&data.emergency_contact_phone)
        .bind(&data.emergency_contact_relationship)
        .bind(&data.photo_url)
        .bind(&data.id_number)
        .bind(membership_type.as_str())
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(status.as_str())
        .bind(&data.notes)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await;

        match result {
            Ok(_) => break,
            Err(e) => {
                let repo_err = RepoError::from(e);
                attempts += 1;
                if matches!(repo_err, RepoError::Duplicate(_)) && attempts < CODE_RETRIES {
                    tracing::debug!(member_code = %member_code, "Member code collision, redrawing");
                    continue;
                }
                return Err(repo_err);
            }
        }
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create member".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: MemberUpdate,
    membership_type: Option<MembershipType>,
) -> RepoResult<Member> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE member SET name = COALESCE(?, name), contact = COALESCE(?, contact), email = COALESCE(?, email), age = COALESCE(?, age), date_of_birth = COALESCE(?, date_of_birth), gender = COALESCE(?, gender), address = COALESCE(?, address), emergency_contact_name = COALESCE(?, emergency_contact_name), emergency_contact_phone = COALESCE(?, emergency_contact_phone), emergency_contact_relationship = COALESCE(?, emergency_contact_relationship), photo_url = COALESCE(?, photo_url), id_number = COALESCE(?, id_number), membership_type = COALESCE(?, membership_type), start_date = COALESCE(?, start_date), end_date = COALESCE(?, end_date), notes = COALESCE(?, notes), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.contact)
    .bind(&data.email)
    .bind(data.age)
    .bind(&data.date_of_birth)
    .bind(&data.gender)
    .bind(&data.address)
    .bind(&data.emergency_contact_name)
    .bind(&data.emergency_contact_phone)
    .bind(&data.emergency_contact_relationship)
    .bind(&data.photo_url)
    .bind(&data.id_number)
    .bind(membership_type.map(|t| t.as_str()))
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(&data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }

    // end_date may have changed; persist the freshly derived status
    let member = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id} not found")))?;
    set_status(pool, id, member.status).await?;
    Ok(member)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    // Hard delete; attendance/payment history is retained, orphaned
    let rows = sqlx::query("DELETE FROM member WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Persist a derived status snapshot (check-in and update paths)
pub async fn set_status(pool: &SqlitePool, id: i64, status: MembershipStatus) -> RepoResult<()> {
    sqlx::query("UPDATE member SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM member")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Members with more than the warning window remaining: `end_date > cutoff`
pub async fn count_active(pool: &SqlitePool, warning_cutoff: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM member WHERE end_date > ?")
        .bind(warning_cutoff)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Members inside the warning window: `now <= end_date <= cutoff`
pub async fn count_expiring_soon(
    pool: &SqlitePool,
    now: i64,
    warning_cutoff: i64,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM member WHERE end_date >= ? AND end_date <= ?",
    )
    .bind(now)
    .bind(warning_cutoff)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
