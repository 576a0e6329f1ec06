//! Account Entity
//!
//! A registered user's identity and profile record. The password hash
//! travels with the entity but is never serialized into API responses.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{AccountId, AccountPassword, DisplayName, Email, PublicId};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Public-facing nanoid identifier (URL-safe), the token subject
    pub public_id: PublicId,
    /// Email (unique, stored lowercase)
    pub email: Email,
    /// Argon2id PHC hash
    pub password_hash: AccountPassword,
    /// Name shown on profiles and the leaderboard
    pub display_name: DisplayName,
    /// Short free-form bio
    pub bio: Option<String>,
    /// Wildlife interests (e.g. "raptors", "marine mammals")
    pub interests: Vec<String>,
    /// Favorite species
    pub favorite_species: Option<String>,
    /// Whether the account may log in
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(display_name: DisplayName, email: Email, password_hash: AccountPassword) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            public_id: PublicId::new(),
            email,
            password_hash,
            display_name,
            bio: None,
            interests: Vec::new(),
            favorite_species: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account may log in
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Replace the password hash
    pub fn set_password(&mut self, password_hash: AccountPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Update display name
    pub fn set_display_name(&mut self, display_name: DisplayName) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    /// Update bio
    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
        self.updated_at = Utc::now();
    }

    /// Update interests
    pub fn set_interests(&mut self, interests: Vec<String>) {
        self.interests = interests;
        self.updated_at = Utc::now();
    }

    /// Update favorite species
    pub fn set_favorite_species(&mut self, favorite_species: Option<String>) {
        self.favorite_species = favorite_species;
        self.updated_at = Utc::now();
    }

    /// Deactivate the account
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::RawPassword;

    fn sample_account() -> Account {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        Account::new(
            DisplayName::new("Jane Doe").unwrap(),
            Email::new("jane@x.com").unwrap(),
            AccountPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[test]
    fn test_new_account_is_active() {
        let account = sample_account();
        assert!(account.is_active);
        assert!(account.can_login());
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn test_deactivate_blocks_login() {
        let mut account = sample_account();
        account.deactivate();
        assert!(!account.can_login());
    }

    #[test]
    fn test_setters_refresh_updated_at() {
        let mut account = sample_account();
        let before = account.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        account.set_bio(Some("Birder since 2019".to_string()));
        assert!(account.updated_at > before);
    }
}
