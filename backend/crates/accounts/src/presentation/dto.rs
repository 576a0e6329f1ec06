//! API DTOs (Data Transfer Objects)
//!
//! Unknown JSON fields are ignored on deserialization, so only the
//! fields named here ever reach a use case.

use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Account
// ============================================================================

/// Account representation for API responses (never includes the hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub public_id: String,
    pub display_name: String,
    pub email: String,
    pub bio: Option<String>,
    pub interests: Vec<String>,
    pub favorite_species: Option<String>,
    pub is_active: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            public_id: account.public_id.to_string(),
            display_name: account.display_name.to_string(),
            email: account.email.to_string(),
            bio: account.bio.clone(),
            interests: account.interests.clone(),
            favorite_species: account.favorite_species.clone(),
            is_active: account.is_active,
            created_at_ms: account.created_at.timestamp_millis(),
            updated_at_ms: account.updated_at.timestamp_millis(),
        }
    }
}

/// Response carrying an account and a freshly issued token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub account: AccountResponse,
    pub token: String,
}

// ============================================================================
// Profile
// ============================================================================

/// Profile update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
    pub favorite_species: Option<String>,
}

// ============================================================================
// Password / deletion
// ============================================================================

/// Change password request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Delete account request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    pub password: String,
}

// ============================================================================
// Token
// ============================================================================

/// Verify token response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub subject: String,
    pub expires_at_ms: i64,
}

/// Generic success message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}
