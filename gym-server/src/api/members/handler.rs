//! Member API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::member;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_optional_one_of, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Member, MemberCreate, MemberUpdate, MembershipType};

const GENDERS: &[&str] = &["Male", "Female", "Other"];

fn validate_common_fields(
    email: &Option<String>,
    date_of_birth: &Option<String>,
    gender: &Option<String>,
    address: &Option<String>,
    emergency_contact_name: &Option<String>,
    emergency_contact_phone: &Option<String>,
    emergency_contact_relationship: &Option<String>,
    photo_url: &Option<String>,
    id_number: &Option<String>,
    notes: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    if let Some(dob) = date_of_birth {
        crate::utils::time::parse_date(dob)?;
    }
    validate_optional_one_of(gender, "gender", GENDERS)?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(emergency_contact_name, "emergency_contact_name", MAX_NAME_LEN)?;
    validate_optional_text(
        emergency_contact_phone,
        "emergency_contact_phone",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_optional_text(
        emergency_contact_relationship,
        "emergency_contact_relationship",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_optional_text(photo_url, "photo_url", MAX_URL_LEN)?;
    validate_optional_text(id_number, "id_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/members - 获取所有会员 (状态实时换算)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Member>>> {
    let members = member::find_all(&state.pool).await?;
    Ok(Json(members))
}

/// GET /api/members/:id - 获取单个会员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Member>> {
    let member = member::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;
    Ok(Json(member))
}

/// POST /api/members - 登记新会员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<Member>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.contact, "contact", MAX_SHORT_TEXT_LEN)?;
    let membership_type: MembershipType = payload.membership_type.parse()?;
    validate_common_fields(
        &payload.email,
        &payload.date_of_birth,
        &payload.gender,
        &payload.address,
        &payload.emergency_contact_name,
        &payload.emergency_contact_phone,
        &payload.emergency_contact_relationship,
        &payload.photo_url,
        &payload.id_number,
        &payload.notes,
    )?;

    let member = member::create(&state.pool, payload, membership_type).await?;

    tracing::info!(
        member_id = member.id,
        member_code = %member.member_code,
        "Member registered"
    );

    Ok(Json(member))
}

/// PUT /api/members/:id - 更新会员 (部分更新，状态重算)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<Member>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(contact) = &payload.contact {
        validate_required_text(contact, "contact", MAX_SHORT_TEXT_LEN)?;
    }
    let membership_type = payload
        .membership_type
        .as_deref()
        .map(str::parse::<MembershipType>)
        .transpose()?;
    validate_common_fields(
        &payload.email,
        &payload.date_of_birth,
        &payload.gender,
        &payload.address,
        &payload.emergency_contact_name,
        &payload.emergency_contact_phone,
        &payload.emergency_contact_relationship,
        &payload.photo_url,
        &payload.id_number,
        &payload.notes,
    )?;

    let member = member::update(&state.pool, id, payload, membership_type).await?;
    Ok(Json(member))
}

/// DELETE /api/members/:id - 删除会员
///
/// Hard delete. Attendance and payment history referencing the member is
/// left in place and shows up in listings with a placeholder name.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = member::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Member not found"));
    }

    tracing::info!(member_id = id, "Member deleted");
    Ok(Json(true))
}
