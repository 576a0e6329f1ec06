//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account registration and login with email + password
//! - Stateless signed bearer tokens (HMAC-SHA256, fixed expiry)
//! - Profile read/update, password change, account deletion
//! - Per-client fixed-window rate limiting on sensitive routes
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, never stored or logged in clear
//! - Email uniqueness enforced by the database unique index
//! - Login failures are reported as a generic "Invalid credentials"
//! - Tokens are verified with constant-time signature comparison;
//!   there is no server-side revocation, so a token stays valid until
//!   its natural expiry even after logout or a password change

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use application::token::{TokenClaims, TokenError, TokenIssuer};
pub use error::{AccountError, AccountResult};
pub use infra::postgres::PgAccountRepository;
pub use presentation::router::accounts_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAccountRepository as AccountStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
