//! 时间工具函数 — 设施时区换算
//!
//! "Today" for check-in purposes means the facility timezone's calendar day,
//! bounded by local midnight. All date→timestamp conversion happens in the
//! API handler layer; repositories only ever see `i64` Unix millis.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期开始 (00:00:00) → Unix millis (设施时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (设施时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// 当前日期 (设施时区)
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 今日零点 → Unix millis (设施时区)
pub fn today_start_millis(tz: Tz) -> i64 {
    day_start_millis(today(tz), tz)
}

/// 本月一号零点 → Unix millis (设施时区)
pub fn month_start_millis(tz: Tz) -> i64 {
    let now = today(tz);
    let first = now.with_day(1).unwrap_or(now);
    day_start_millis(first, tz)
}
