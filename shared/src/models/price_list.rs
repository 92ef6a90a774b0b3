//! Membership price list
//!
//! Server-held reference configuration keyed by plan name. Informational for
//! the front desk; payment amounts are still entered by the operator.

use serde::{Deserialize, Serialize};

/// Current price per membership type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PriceList {
    pub daily: f64,
    pub monthly: f64,
    pub quarterly: f64,
    pub annual: f64,
    pub updated_at: i64,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            daily: 50.0,
            monthly: 500.0,
            quarterly: 1350.0,
            annual: 5000.0,
            updated_at: 0,
        }
    }
}

/// Update price list payload (all four prices required)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceListUpdate {
    pub daily: f64,
    pub monthly: f64,
    pub quarterly: f64,
    pub annual: f64,
}
