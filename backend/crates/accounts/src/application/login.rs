//! Login Use Case
//!
//! Authenticates an account and issues a fresh session token.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::token::TokenIssuer;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountPassword, Email, RawPassword};
use crate::error::{AccountError, AccountResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub account: Account,
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AccountsConfig>,
}

impl<R> LoginUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenIssuer>, config: Arc<AccountsConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    /// Every credential failure maps to the same `InvalidCredentials`,
    /// whether the email is unknown, unparseable, or the password is
    /// wrong.
    pub async fn execute(&self, input: LoginInput) -> AccountResult<LoginOutput> {
        let email = Email::new(input.email).map_err(|_| AccountError::InvalidCredentials)?;

        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !account.can_login() {
            return Err(AccountError::AccountDisabled);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AccountError::InvalidCredentials)?;

        if !account
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            tracing::warn!(public_id = %account.public_id, "Password mismatch on login");
            return Err(AccountError::InvalidCredentials);
        }

        // Upgrade stale hashes while the clear text is at hand; a failure
        // here must not block the login
        if account.password_hash.needs_rehash() {
            match AccountPassword::from_raw(&raw_password, self.config.pepper()) {
                Ok(new_hash) => {
                    if let Err(e) = self
                        .repo
                        .update_password_hash(&account.account_id, &new_hash)
                        .await
                    {
                        tracing::warn!(error = %e, "Failed to store upgraded password hash");
                    } else {
                        tracing::info!(
                            public_id = %account.public_id,
                            "Password hash upgraded to current parameters"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Password hash upgrade failed");
                }
            }
        }

        let token = self.tokens.issue(&account.public_id);

        tracing::info!(
            public_id = %account.public_id,
            "Account logged in"
        );

        Ok(LoginOutput { account, token })
    }
}
