//! Payment Model
//!
//! Payment rows are immutable once written; there is no update or delete.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{MembershipType, ParseEnumError};

/// Renewal plan attached to a payment. Daily passes are sold at the desk but
/// are not a renewal plan, so they are absent here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum MembershipPlan {
    Monthly,
    Quarterly,
    Annual,
}

impl MembershipPlan {
    /// Renewal window length. Fixed day-offsets, deliberately not
    /// calendar-month arithmetic.
    pub fn duration_days(&self) -> i64 {
        match self {
            Self::Monthly => 30,
            Self::Quarterly => 90,
            Self::Annual => 365,
        }
    }

    /// The membership type a renewal under this plan switches the member to
    pub fn membership_type(&self) -> MembershipType {
        match self {
            Self::Monthly => MembershipType::Monthly,
            Self::Quarterly => MembershipType::Quarterly,
            Self::Annual => MembershipType::Annual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
        }
    }
}

impl FromStr for MembershipPlan {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monthly" => Ok(Self::Monthly),
            "Quarterly" => Ok(Self::Quarterly),
            "Annual" => Ok(Self::Annual),
            other => Err(ParseEnumError {
                field: "membership_plan",
                value: other.to_string(),
            }),
        }
    }
}

/// Payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    /// Non-owning member reference; may outlive the member row
    pub member_id: i64,
    pub amount: f64,
    /// Unix millis
    pub payment_date: i64,
    pub payment_method: String,
    pub membership_plan: MembershipPlan,
    /// Operator who recorded the payment
    pub staff_name: String,
    pub created_at: i64,
}

/// Payment record with member name joined in (for listings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentWithMember {
    pub id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub amount: f64,
    pub payment_date: i64,
    pub payment_method: String,
    pub membership_plan: MembershipPlan,
    pub staff_name: String,
    pub created_at: i64,
}

/// Record payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub member_id: i64,
    pub amount: f64,
    /// Validated server-side against {Monthly, Quarterly, Annual}
    pub membership_plan: String,
    /// Defaults to "Cash"
    pub payment_method: Option<String>,
}
