//! Application Configuration
//!
//! Configuration for the Accounts application layer.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

/// Accounts application configuration
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Token signing secret for HMAC (32 bytes), loaded once at startup.
    /// Rotating it invalidates every outstanding token.
    pub token_secret: [u8; 32],
    /// Token TTL (1 week)
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Rate limit for POST /login
    pub login_rate_limit: RateLimitConfig,
    /// Rate limit for POST /register
    pub register_rate_limit: RateLimitConfig,
    /// Rate limit for the remaining account routes
    pub general_rate_limit: RateLimitConfig,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            token_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            password_pepper: None,
            login_rate_limit: RateLimitConfig::new(5, 15 * 60),
            register_rate_limit: RateLimitConfig::new(3, 3600),
            general_rate_limit: RateLimitConfig::new(100, 15 * 60),
        }
    }
}

impl AccountsConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Get token TTL in milliseconds
    pub fn token_ttl_ms(&self) -> i64 {
        self.token_ttl.as_millis() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
