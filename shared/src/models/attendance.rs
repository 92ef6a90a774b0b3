//! Attendance Model
//!
//! A record with `check_out_time = NULL` is an open session ("currently in
//! the gym"). Per member and calendar day at most one open session exists.

use serde::{Deserialize, Serialize};

/// Attendance record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attendance {
    pub id: i64,
    /// Non-owning member reference; may outlive the member row
    pub member_id: i64,
    /// Unix millis
    pub check_in_time: i64,
    /// Unix millis, NULL while the member is in the gym
    pub check_out_time: Option<i64>,
    /// Operator who performed the check-in
    pub staff_name: String,
    pub created_at: i64,
}

/// Attendance record with member identity joined in (for listings).
///
/// The join is a LEFT JOIN: history referencing a deleted member stays
/// visible with a placeholder name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceWithMember {
    pub id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub member_contact: String,
    pub check_in_time: i64,
    pub check_out_time: Option<i64>,
    pub staff_name: String,
    pub created_at: i64,
}

/// Check-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub member_id: i64,
}

/// Check-out payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutRequest {
    pub member_id: i64,
}
