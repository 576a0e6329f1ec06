//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::token::TokenIssuer;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, DeleteAccountInput, DeleteAccountUseCase,
    GetProfileUseCase, LoginInput, LoginUseCase, LogoutUseCase, ProfileUpdateInput,
    RegisterInput, RegisterUseCase, UpdateProfileUseCase,
};
use crate::domain::repository::AccountRepository;
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{
    AccountResponse, AuthResponse, ChangePasswordRequest, DeleteAccountRequest, LoginRequest,
    MessageResponse, RegisterRequest, UpdateProfileRequest, VerifyTokenResponse,
};
use crate::presentation::middleware::{Authenticated, extract_bearer_token};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountAppState<R>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccountsConfig>,
    pub tokens: Arc<TokenIssuer>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/accounts/register
pub async fn register<R>(
    State(state): State<AccountAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AccountResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        display_name: req.display_name,
        email: req.email,
        password: req.password,
        confirm_password: req.confirm_password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            account: AccountResponse::from(&output.account),
            token: output.token,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/accounts/login
pub async fn login<R>(
    State(state): State<AccountAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AccountResult<Json<AuthResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(AuthResponse {
        account: AccountResponse::from(&output.account),
        token: output.token,
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/accounts/logout
///
/// Succeeds whether or not a usable token was presented; there is no
/// server-side session to tear down.
pub async fn logout<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(&headers);

    let use_case = LogoutUseCase::new(state.tokens.clone());
    use_case.execute(token.as_deref()).await?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/accounts/profile
pub async fn get_profile<R>(
    State(state): State<AccountAppState<R>>,
    Extension(auth): Extension<Authenticated>,
) -> AccountResult<Json<AccountResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = GetProfileUseCase::new(state.repo.clone());

    let account = use_case.execute(&auth.public_id).await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// PUT /api/accounts/profile
pub async fn update_profile<R>(
    State(state): State<AccountAppState<R>>,
    Extension(auth): Extension<Authenticated>,
    Json(req): Json<UpdateProfileRequest>,
) -> AccountResult<Json<AccountResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    let input = ProfileUpdateInput {
        display_name: req.display_name,
        bio: req.bio,
        interests: req.interests,
        favorite_species: req.favorite_species,
    };

    let account = use_case.execute(&auth.public_id, input).await?;

    Ok(Json(AccountResponse::from(&account)))
}

// ============================================================================
// Password / deletion
// ============================================================================

/// PUT /api/accounts/change-password
pub async fn change_password<R>(
    State(state): State<AccountAppState<R>>,
    Extension(auth): Extension<Authenticated>,
    Json(req): Json<ChangePasswordRequest>,
) -> AccountResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());

    let input = ChangePasswordInput {
        current_password: req.current_password,
        new_password: req.new_password,
        confirm_password: req.confirm_password,
    };

    use_case.execute(&auth.public_id, input).await?;

    Ok(Json(MessageResponse {
        message: "Password changed".to_string(),
    }))
}

/// DELETE /api/accounts/delete-account
pub async fn delete_account<R>(
    State(state): State<AccountAppState<R>>,
    Extension(auth): Extension<Authenticated>,
    Json(req): Json<DeleteAccountRequest>,
) -> AccountResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = DeleteAccountUseCase::new(state.repo.clone(), state.config.clone());

    let input = DeleteAccountInput {
        password: req.password,
    };

    use_case.execute(&auth.public_id, input).await?;

    Ok(Json(MessageResponse {
        message: "Account deleted".to_string(),
    }))
}

// ============================================================================
// Token verification
// ============================================================================

/// GET /api/accounts/verify-token
pub async fn verify_token<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<Json<VerifyTokenResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(&headers).ok_or(AccountError::TokenInvalid)?;

    let claims = state.tokens.verify(&token)?;

    Ok(Json(VerifyTokenResponse {
        subject: claims.subject.to_string(),
        expires_at_ms: claims.expires_at_ms,
    }))
}
