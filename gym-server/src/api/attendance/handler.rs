//! Attendance API Handlers
//!
//! "Today" is the facility timezone's calendar day starting at local
//! midnight; listings cap at 100 rows except the uncapped today view.

use axum::{
    Json,
    extract::{Extension, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{attendance, member};
use crate::utils::time;
use crate::utils::{AppError, AppResult};
use shared::models::{
    AttendanceWithMember, CheckInRequest, CheckOutRequest, MembershipStatus,
};

const LIST_LIMIT: i64 = 100;

/// Check-in confirmation
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub attendance_id: i64,
    pub member_name: String,
    pub check_in_time: i64,
}

/// Check-out confirmation
#[derive(Debug, Serialize)]
pub struct CheckOutResponse {
    pub check_out_time: i64,
}

/// Query params for listing attendance
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub member_id: Option<i64>,
    /// YYYY-MM-DD, restricted to that facility-timezone day
    pub date: Option<String>,
}

/// POST /api/attendance/checkin - 签到
///
/// Loads the member, re-derives and persists status, rejects Expired
/// memberships and duplicate open sessions for the day.
pub async fn check_in(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CheckInRequest>,
) -> AppResult<Json<CheckInResponse>> {
    let m = member::find_by_id(&state.pool, payload.member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;

    // find_by_id already derived the fresh status; persist the snapshot
    member::set_status(&state.pool, m.id, m.status).await?;

    if m.status == MembershipStatus::Expired {
        return Err(AppError::business_rule(
            "Member subscription has expired. Please renew.",
        ));
    }

    let day_start = time::today_start_millis(state.config.timezone);
    let record =
        attendance::check_in(&state.pool, m.id, &current_user.name, day_start).await?;

    tracing::info!(
        member_id = m.id,
        attendance_id = record.id,
        staff = %current_user.name,
        "Member checked in"
    );

    Ok(Json(CheckInResponse {
        attendance_id: record.id,
        member_name: m.name,
        check_in_time: record.check_in_time,
    }))
}

/// POST /api/attendance/checkout - 签退
pub async fn check_out(
    State(state): State<ServerState>,
    Json(payload): Json<CheckOutRequest>,
) -> AppResult<Json<CheckOutResponse>> {
    let day_start = time::today_start_millis(state.config.timezone);
    let record = attendance::check_out(&state.pool, payload.member_id, day_start).await?;

    tracing::info!(
        member_id = payload.member_id,
        attendance_id = record.id,
        "Member checked out"
    );

    let check_out_time = record
        .check_out_time
        .ok_or_else(|| AppError::internal("Check-out did not persist a timestamp"))?;

    Ok(Json(CheckOutResponse { check_out_time }))
}

/// GET /api/attendance - 按会员/日期过滤的签到记录
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<AttendanceWithMember>>> {
    let tz = state.config.timezone;
    let window = match &query.date {
        Some(date) => {
            let day = time::parse_date(date)?;
            Some((time::day_start_millis(day, tz), time::day_end_millis(day, tz)))
        }
        None => None,
    };

    let records =
        attendance::find_by_filter(&state.pool, query.member_id, window, LIST_LIMIT).await?;
    Ok(Json(records))
}

/// GET /api/attendance/today - 今日全部签到记录
pub async fn list_today(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<AttendanceWithMember>>> {
    let day_start = time::today_start_millis(state.config.timezone);
    let records = attendance::find_since(&state.pool, day_start).await?;
    Ok(Json(records))
}
