//! Client-facing auth DTOs

use serde::{Deserialize, Serialize};

use crate::models::UserRole;

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: bearer token plus the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Public view of a user account (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub role: UserRole,
    pub created_at: i64,
}

/// Register payload. Admin-gated once any account exists; the very first
/// account may self-register to bootstrap a fresh installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    /// "Admin" or "Staff", validated server-side
    pub role: String,
}
