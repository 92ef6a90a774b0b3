//! Domain models

mod attendance;
mod member;
mod payment;
mod price_list;
mod user;

pub use attendance::{Attendance, AttendanceWithMember, CheckInRequest, CheckOutRequest};
pub use member::{
    EXPIRY_WARNING_DAYS, Member, MemberCreate, MemberUpdate, MembershipStatus, MembershipType,
    generate_member_code,
};
pub use payment::{MembershipPlan, Payment, PaymentCreate, PaymentWithMember};
pub use price_list::{PriceList, PriceListUpdate};
pub use user::UserRole;

use thiserror::Error;

/// Failure to parse an enum-valued field from its wire representation
#[derive(Debug, Error)]
#[error("unrecognized value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}
