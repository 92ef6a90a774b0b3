//! Settings API Handlers
//!
//! Membership price configuration. Held server-side so every front-desk
//! station sees the same numbers.

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::price_list;
use crate::utils::AppResult;
use crate::utils::validation::validate_price;
use shared::models::{PriceList, PriceListUpdate};

/// GET /api/settings/prices - 当前价格表
pub async fn get_prices(State(state): State<ServerState>) -> AppResult<Json<PriceList>> {
    let prices = price_list::get(&state.pool).await?;
    Ok(Json(prices))
}

/// PUT /api/settings/prices - 更新价格表 (仅管理员)
pub async fn update_prices(
    State(state): State<ServerState>,
    Json(payload): Json<PriceListUpdate>,
) -> AppResult<Json<PriceList>> {
    validate_price(payload.daily, "daily")?;
    validate_price(payload.monthly, "monthly")?;
    validate_price(payload.quarterly, "quarterly")?;
    validate_price(payload.annual, "annual")?;

    let prices = price_list::update(&state.pool, payload).await?;

    tracing::info!(
        daily = prices.daily,
        monthly = prices.monthly,
        quarterly = prices.quarterly,
        annual = prices.annual,
        "Membership prices updated"
    );

    Ok(Json(prices))
}
