//! Register Use Case
//!
//! Creates a new account and issues its first session token.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::token::TokenIssuer;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountPassword, DisplayName, Email, RawPassword};
use crate::error::{AccountError, AccountResult};

/// Register input
pub struct RegisterInput {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub account: Account,
    pub token: String,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AccountsConfig>,
}

impl<R> RegisterUseCase<R>
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

    /// All validation happens before any side effect. Duplicate emails
    /// surface from the storage unique index, not from a pre-check.
    pub async fn execute(&self, input: RegisterInput) -> AccountResult<RegisterOutput> {
        let display_name = DisplayName::new(input.display_name)
            .map_err(|e| AccountError::Validation(e.message().to_string()))?;

        let email = Email::new(input.email)
            .map_err(|e| AccountError::Validation(e.message().to_string()))?;

        if let Some(confirm) = &input.confirm_password {
            if *confirm != input.password {
                return Err(AccountError::Validation(
                    "Passwords do not match".to_string(),
                ));
            }
        }

        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AccountError::Validation(e.message().to_string()))?;
        let password_hash = AccountPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let account = Account::new(display_name, email, password_hash);

        self.repo.create(&account).await?;

        let token = self.tokens.issue(&account.public_id);

        tracing::info!(
            public_id = %account.public_id,
            "Account registered"
        );

        Ok(RegisterOutput { account, token })
    }
}
