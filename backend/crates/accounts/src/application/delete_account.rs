//! Delete Account Use Case
//!
//! Re-verifies the password, then removes the account together with its
//! dependent records (quiz results, badge awards) in one transaction.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{PublicId, RawPassword};
use crate::error::{AccountError, AccountResult};

/// Delete account input
pub struct DeleteAccountInput {
    pub password: String,
}

/// Delete account use case
pub struct DeleteAccountUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> DeleteAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        subject: &PublicId,
        input: DeleteAccountInput,
    ) -> AccountResult<()> {
        let account = self
            .repo
            .find_by_public_id(subject)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        let password =
            RawPassword::new(input.password).map_err(|_| AccountError::InvalidCredentials)?;

        if !account.password_hash.verify(&password, self.config.pepper()) {
            tracing::warn!(
                public_id = %account.public_id,
                "Account deletion rejected: password mismatch"
            );
            return Err(AccountError::InvalidCredentials);
        }

        self.repo.delete_with_dependents(&account.account_id).await?;

        tracing::info!(public_id = %account.public_id, "Account deleted");

        Ok(())
    }
}
