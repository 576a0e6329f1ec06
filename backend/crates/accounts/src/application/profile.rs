//! Profile Use Cases
//!
//! Read and update the authenticated account's profile.

use std::sync::Arc;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{DisplayName, PublicId};
use crate::error::{AccountError, AccountResult};

/// Get profile use case
pub struct GetProfileUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> GetProfileUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, subject: &PublicId) -> AccountResult<Account> {
        self.repo
            .find_by_public_id(subject)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }
}

/// Profile update input
///
/// `None` fields are left unchanged. Unknown request fields never reach
/// this type; serde drops them at the DTO boundary.
#[derive(Debug, Default)]
pub struct ProfileUpdateInput {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
    pub favorite_species: Option<String>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        subject: &PublicId,
        input: ProfileUpdateInput,
    ) -> AccountResult<Account> {
        let mut account = self
            .repo
            .find_by_public_id(subject)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        if let Some(display_name) = input.display_name {
            let display_name = DisplayName::new(display_name)
                .map_err(|e| AccountError::Validation(e.message().to_string()))?;
            account.set_display_name(display_name);
        }

        if let Some(bio) = input.bio {
            account.set_bio(Some(bio));
        }

        if let Some(interests) = input.interests {
            account.set_interests(interests);
        }

        if let Some(favorite_species) = input.favorite_species {
            account.set_favorite_species(Some(favorite_species));
        }

        self.repo.update(&account).await?;

        tracing::info!(public_id = %account.public_id, "Profile updated");

        Ok(account)
    }
}
