//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::account::Account;
use crate::domain::value_object::{AccountId, AccountPassword, Email, PublicId};
use crate::error::AccountResult;

/// Account repository trait
///
/// Implementations must enforce email uniqueness at the storage layer
/// (unique index); `create` reports a duplicate as
/// `AccountError::EmailTaken` based on the constraint violation, not on
/// a prior existence check.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AccountResult<()>;

    /// Find account by public ID
    async fn find_by_public_id(&self, public_id: &PublicId) -> AccountResult<Option<Account>>;

    /// Find account by email (stored lowercase, lookup is case-insensitive)
    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>>;

    /// Update profile fields
    async fn update(&self, account: &Account) -> AccountResult<()>;

    /// Replace the stored password hash
    async fn update_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &AccountPassword,
    ) -> AccountResult<()>;

    /// Delete the account and its dependent records (quiz results, badge
    /// awards) in one transaction
    async fn delete_with_dependents(&self, account_id: &AccountId) -> AccountResult<()>;
}
