//! Change Password Use Case
//!
//! Verifies the current password before rehashing and storing the new
//! one. Outstanding tokens cannot be revoked without a server-side
//! session registry, so they remain valid until their natural expiry.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountPassword, PublicId, RawPassword};
use crate::error::{AccountError, AccountResult};

/// Change password input
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        subject: &PublicId,
        input: ChangePasswordInput,
    ) -> AccountResult<()> {
        if input.new_password != input.confirm_password {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }

        let new_password = RawPassword::new(input.new_password)
            .map_err(|e| AccountError::Validation(e.message().to_string()))?;

        let account = self
            .repo
            .find_by_public_id(subject)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        // A current password that fails the policy cannot be the stored one
        let current_password = RawPassword::new(input.current_password)
            .map_err(|_| AccountError::InvalidCredentials)?;

        if !account
            .password_hash
            .verify(&current_password, self.config.pepper())
        {
            tracing::warn!(
                public_id = %account.public_id,
                "Password change rejected: current password mismatch"
            );
            return Err(AccountError::InvalidCredentials);
        }

        let new_hash = AccountPassword::from_raw(&new_password, self.config.pepper())
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        self.repo
            .update_password_hash(&account.account_id, &new_hash)
            .await?;

        tracing::info!(public_id = %account.public_id, "Password changed");

        Ok(())
    }
}
