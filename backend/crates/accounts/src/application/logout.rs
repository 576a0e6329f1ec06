//! Logout Use Case
//!
//! Tokens are stateless and there is no server-side session to
//! invalidate, so logout always succeeds; the client discards its token
//! and the token itself lapses at its natural expiry.

use std::sync::Arc;

use crate::application::token::TokenIssuer;
use crate::error::AccountResult;

/// Logout use case
pub struct LogoutUseCase {
    tokens: Arc<TokenIssuer>,
}

impl LogoutUseCase {
    pub fn new(tokens: Arc<TokenIssuer>) -> Self {
        Self { tokens }
    }

    /// Succeeds unconditionally; the token is only inspected for logging.
    pub async fn execute(&self, token: Option<&str>) -> AccountResult<()> {
        match token.map(|t| self.tokens.verify(t)) {
            Some(Ok(claims)) => {
                tracing::info!(public_id = %claims.subject, "Account logged out");
            }
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Logout with unusable token");
            }
            None => {
                tracing::debug!("Logout without token");
            }
        }

        Ok(())
    }
}
