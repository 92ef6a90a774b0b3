//! User role

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ParseEnumError;

/// Front-desk operator role. Admin may manage members, users and prices;
/// Staff handles day-to-day check-ins and payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum UserRole {
    Admin,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Staff" => Ok(Self::Staff),
            other => Err(ParseEnumError {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}
