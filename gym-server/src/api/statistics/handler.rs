//! Statistics API Handlers
//!
//! Read-only roll-up for the front-desk dashboard. Every number is computed
//! fresh per call; nothing is cached or incrementally maintained.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{attendance, member, payment};
use crate::utils::AppResult;
use crate::utils::time;
use shared::models::EXPIRY_WARNING_DAYS;
use shared::util::{DAY_MILLIS, now_millis};

/// Dashboard snapshot
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_members: i64,
    pub active_members: i64,
    pub expiring_soon: i64,
    pub today_attendance: i64,
    pub currently_checked_in: i64,
    pub monthly_revenue: f64,
}

/// GET /api/dashboard/stats - 仪表盘统计
///
/// Status buckets use the same thresholds as the pure derivation: Active is
/// `end_date > now + warning window`, Expiring Soon is
/// `now <= end_date <= now + warning window`.
pub async fn dashboard_stats(
    State(state): State<ServerState>,
) -> AppResult<Json<DashboardStats>> {
    let tz = state.config.timezone;
    let now = now_millis();
    let warning_cutoff = now + EXPIRY_WARNING_DAYS * DAY_MILLIS;
    let day_start = time::today_start_millis(tz);
    let month_start = time::month_start_millis(tz);

    let total_members = member::count_all(&state.pool).await?;
    let active_members = member::count_active(&state.pool, warning_cutoff).await?;
    let expiring_soon = member::count_expiring_soon(&state.pool, now, warning_cutoff).await?;
    let today_attendance = attendance::count_since(&state.pool, day_start).await?;
    let currently_checked_in = attendance::count_open_since(&state.pool, day_start).await?;
    let monthly_revenue = payment::sum_since(&state.pool, month_start).await?;

    Ok(Json(DashboardStats {
        total_members,
        active_members,
        expiring_soon,
        today_attendance,
        currently_checked_in,
        monthly_revenue,
    }))
}
