//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use nid::Nanoid;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    AccountId, AccountPassword, DisplayName, Email, PublicId,
};
use crate::error::{AccountError, AccountResult};

/// PostgreSQL unique-violation error code
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                public_id,
                email,
                password_hash,
                display_name,
                bio,
                interests,
                favorite_species,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.public_id.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.display_name.as_str())
        .bind(&account.bio)
        .bind(&account.interests)
        .bind(&account.favorite_species)
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        // The unique index on email is the authoritative duplicate check
        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(AccountError::EmailTaken)
            }
            Err(e) => Err(AccountError::Database(e)),
        }
    }

    async fn find_by_public_id(&self, public_id: &PublicId) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                public_id,
                email,
                password_hash,
                display_name,
                bio,
                interests,
                favorite_species,
                is_active,
                created_at,
                updated_at
            FROM accounts
            WHERE public_id = $1
            "#,
        )
        .bind(public_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                public_id,
                email,
                password_hash,
                display_name,
                bio,
                interests,
                favorite_species,
                is_active,
                created_at,
                updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn update(&self, account: &Account) -> AccountResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                display_name = $2,
                bio = $3,
                interests = $4,
                favorite_species = $5,
                is_active = $6,
                updated_at = $7
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.display_name.as_str())
        .bind(&account.bio)
        .bind(&account.interests)
        .bind(&account.favorite_species)
        .bind(account.is_active)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &AccountPassword,
    ) -> AccountResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                password_hash = $2,
                updated_at = $3
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(password_hash.as_phc_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_with_dependents(&self, account_id: &AccountId) -> AccountResult<()> {
        let mut tx = self.pool.begin().await?;

        let quiz_results = sqlx::query("DELETE FROM quiz_results WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let badge_awards = sqlx::query("DELETE FROM badge_awards WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let accounts = sqlx::query("DELETE FROM accounts WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if accounts == 0 {
            tx.rollback().await?;
            return Err(AccountError::AccountNotFound);
        }

        tx.commit().await?;

        tracing::info!(
            account_id = %account_id,
            quiz_results_deleted = quiz_results,
            badge_awards_deleted = badge_awards,
            "Account and dependent records deleted"
        );

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    public_id: String,
    email: String,
    password_hash: String,
    display_name: String,
    bio: Option<String>,
    interests: Vec<String>,
    favorite_species: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccountResult<Account> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AccountError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        let password_hash = AccountPassword::from_phc_string(self.password_hash)
            .map_err(|e| AccountError::Internal(e.message().to_string()))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            public_id,
            email: Email::from_db(self.email),
            password_hash,
            display_name: DisplayName::from_db(self.display_name),
            bio: self.bio,
            interests: self.interests,
            favorite_species: self.favorite_species,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
