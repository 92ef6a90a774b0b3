//! Member Model
//!
//! Membership status is never trusted as stored state: every read or write
//! path that exposes a member recomputes it from `end_date` via
//! [`MembershipStatus::derive`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ParseEnumError;

use crate::util::DAY_MILLIS;

/// Members whose remaining days are at or below this count are flagged
/// Expiring Soon. Fixed front-desk policy.
pub const EXPIRY_WARNING_DAYS: i64 = 3;

/// Membership duration class selected at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum MembershipType {
    Daily,
    Monthly,
    Quarterly,
    Annual,
}

impl MembershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
        }
    }
}

impl FromStr for MembershipType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Daily" => Ok(Self::Daily),
            "Monthly" => Ok(Self::Monthly),
            "Quarterly" => Ok(Self::Quarterly),
            "Annual" => Ok(Self::Annual),
            other => Err(ParseEnumError {
                field: "membership_type",
                value: other.to_string(),
            }),
        }
    }
}

/// Derived membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum MembershipStatus {
    Active,
    #[serde(rename = "Expiring Soon")]
    #[cfg_attr(feature = "db", sqlx(rename = "Expiring Soon"))]
    ExpiringSoon,
    Expired,
}

impl MembershipStatus {
    /// Pure derivation from `end_date` and the current time, both Unix millis.
    ///
    /// A membership that ended any time in the past is Expired; otherwise the
    /// remaining days are rounded up, so a window ending later today counts
    /// as 0 days left and an end exactly N days out counts as N.
    pub fn derive(end_date: i64, now: i64) -> Self {
        if end_date < now {
            return Self::Expired;
        }
        let days_left = ((end_date - now) as u64).div_ceil(DAY_MILLIS as u64) as i64;
        if days_left <= EXPIRY_WARNING_DAYS {
            Self::ExpiringSoon
        } else {
            Self::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Expired => "Expired",
        }
    }
}

/// Member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    /// Human-readable code, `GM{YY}{MM}{NNNN}`, unique, immutable
    pub member_code: String,
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    /// ISO date, `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub photo_url: Option<String>,
    pub id_number: Option<String>,
    pub membership_type: MembershipType,
    /// Membership window start, Unix millis
    pub start_date: i64,
    /// Membership window end, Unix millis
    pub end_date: i64,
    /// Persisted snapshot only; recomputed on every read
    pub status: MembershipStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create member payload
///
/// Enum-valued fields arrive as strings and are validated server-side so a
/// bad value reports which field was unrecognized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub name: String,
    pub contact: String,
    pub membership_type: String,
    pub start_date: i64,
    pub end_date: i64,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub photo_url: Option<String>,
    pub id_number: Option<String>,
    pub notes: Option<String>,
}

/// Update member payload (partial; omitted fields are untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub membership_type: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub photo_url: Option<String>,
    pub id_number: Option<String>,
    pub notes: Option<String>,
}

/// Generate a member code: `GM` + two-digit year + two-digit month + a random
/// four-digit suffix. The suffix alone does not guarantee uniqueness; the
/// storage layer enforces it with a UNIQUE constraint and the caller retries
/// on collision.
pub fn generate_member_code(now: i64) -> String {
    use chrono::{Datelike, TimeZone, Utc};
    use rand::Rng;

    let when = Utc
        .timestamp_millis_opt(now)
        .single()
        .unwrap_or_else(Utc::now);
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!(
        "GM{:02}{:02}{:04}",
        when.year() % 100,
        when.month(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;
    const NOW: i64 = 1_760_000_000_000;

    #[test]
    fn status_expired_when_end_date_in_the_past() {
        assert_eq!(
            MembershipStatus::derive(NOW - HOUR, NOW),
            MembershipStatus::Expired
        );
        assert_eq!(
            MembershipStatus::derive(NOW - 40 * DAY_MILLIS, NOW),
            MembershipStatus::Expired
        );
    }

    #[test]
    fn status_expiring_soon_within_three_days() {
        // Ends later today: 0 days left
        assert_eq!(
            MembershipStatus::derive(NOW + HOUR, NOW),
            MembershipStatus::ExpiringSoon
        );
        assert_eq!(
            MembershipStatus::derive(NOW + 2 * DAY_MILLIS, NOW),
            MembershipStatus::ExpiringSoon
        );
        // Exactly three days out rounds to 3
        assert_eq!(
            MembershipStatus::derive(NOW + 3 * DAY_MILLIS, NOW),
            MembershipStatus::ExpiringSoon
        );
    }

    #[test]
    fn status_active_beyond_three_days() {
        // Three days plus an hour rounds up to 4
        assert_eq!(
            MembershipStatus::derive(NOW + 3 * DAY_MILLIS + HOUR, NOW),
            MembershipStatus::Active
        );
        assert_eq!(
            MembershipStatus::derive(NOW + 4 * DAY_MILLIS, NOW),
            MembershipStatus::Active
        );
        assert_eq!(
            MembershipStatus::derive(NOW + 365 * DAY_MILLIS, NOW),
            MembershipStatus::Active
        );
    }

    #[test]
    fn status_boundary_is_start_of_membership_end() {
        // end_date == now: not yet past, 0 days left
        assert_eq!(
            MembershipStatus::derive(NOW, NOW),
            MembershipStatus::ExpiringSoon
        );
    }

    #[test]
    fn member_code_format() {
        // 2026-08 in millis
        let august_2026 = 1_786_600_000_000;
        let code = generate_member_code(august_2026);
        assert_eq!(code.len(), 10);
        assert!(code.starts_with("GM2608"));
        assert!(code[6..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn membership_type_round_trip() {
        for s in ["Daily", "Monthly", "Quarterly", "Annual"] {
            assert_eq!(s.parse::<MembershipType>().unwrap().as_str(), s);
        }
        assert!("Weekly".parse::<MembershipType>().is_err());
    }
}
