//! Payment API Handlers

use axum::{
    Json,
    extract::{Extension, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{member, payment};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{MembershipPlan, PaymentCreate, PaymentWithMember};

const LIST_LIMIT: i64 = 100;

/// Payment confirmation: the new membership window for the receipt
#[derive(Debug, Serialize)]
pub struct PaymentRecorded {
    pub payment_id: i64,
    pub member_id: i64,
    pub amount: f64,
    pub membership_plan: MembershipPlan,
    pub end_date: i64,
}

/// Query params for listing payments
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub member_id: Option<i64>,
}

/// POST /api/payments - 收款并激活/延长会籍
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<PaymentRecorded>> {
    let plan: MembershipPlan = payload.membership_plan.parse()?;
    validate_amount(payload.amount, "amount")?;
    validate_optional_text(&payload.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;

    let m = member::find_by_id(&state.pool, payload.member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;

    let method = payload.payment_method.as_deref().unwrap_or("Cash");
    let record = payment::record(
        &state.pool,
        m.id,
        payload.amount,
        plan,
        method,
        &current_user.name,
    )
    .await?;

    let renewed = member::find_by_id(&state.pool, m.id)
        .await?
        .ok_or_else(|| AppError::internal("Member disappeared during renewal"))?;

    tracing::info!(
        member_id = m.id,
        payment_id = record.id,
        amount = record.amount,
        plan = %plan.as_str(),
        staff = %current_user.name,
        "Payment recorded, membership renewed"
    );

    Ok(Json(PaymentRecorded {
        payment_id: record.id,
        member_id: m.id,
        amount: record.amount,
        membership_plan: record.membership_plan,
        end_date: renewed.end_date,
    }))
}

/// GET /api/payments - 收款记录
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PaymentWithMember>>> {
    let payments = payment::find_by_filter(&state.pool, query.member_id, LIST_LIMIT).await?;
    Ok(Json(payments))
}
