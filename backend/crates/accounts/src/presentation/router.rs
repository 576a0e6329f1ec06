//! Accounts Router

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use platform::rate_limit::MemoryRateLimiter;

use crate::application::config::AccountsConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::AccountRepository;
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AccountAppState};
use crate::presentation::middleware::{RateLimitState, enforce_rate_limit, require_account};

/// Create the Accounts router with PostgreSQL repository
pub fn accounts_router(repo: PgAccountRepository, config: AccountsConfig) -> Router {
    accounts_router_generic(repo, config)
}

/// Create a generic Accounts router for any repository implementation
pub fn accounts_router_generic<R>(repo: R, config: AccountsConfig) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let config = Arc::new(config);
    let tokens = Arc::new(TokenIssuer::new(config.token_secret, config.token_ttl));

    let state = AccountAppState {
        repo: Arc::new(repo),
        config: config.clone(),
        tokens: tokens.clone(),
    };

    // One limiter per route class, owned here and injected via state
    let register_limit = RateLimitState::new(
        Arc::new(MemoryRateLimiter::new()),
        config.register_rate_limit.clone(),
    );
    let login_limit = RateLimitState::new(
        Arc::new(MemoryRateLimiter::new()),
        config.login_rate_limit.clone(),
    );
    let general_limit = RateLimitState::new(
        Arc::new(MemoryRateLimiter::new()),
        config.general_rate_limit.clone(),
    );

    let protected = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile::<R>).put(handlers::update_profile::<R>),
        )
        .route("/change-password", put(handlers::change_password::<R>))
        .route("/delete-account", delete(handlers::delete_account::<R>))
        .route_layer(middleware::from_fn_with_state(
            tokens.clone(),
            require_account,
        ));

    let open = Router::new()
        .route("/logout", post(handlers::logout::<R>))
        .route("/verify-token", get(handlers::verify_token::<R>));

    Router::new()
        .merge(
            Router::new()
                .route("/register", post(handlers::register::<R>))
                .route_layer(middleware::from_fn_with_state(
                    register_limit,
                    enforce_rate_limit::<MemoryRateLimiter>,
                )),
        )
        .merge(
            Router::new()
                .route("/login", post(handlers::login::<R>))
                .route_layer(middleware::from_fn_with_state(
                    login_limit,
                    enforce_rate_limit::<MemoryRateLimiter>,
                )),
        )
        .merge(
            protected
                .merge(open)
                .route_layer(middleware::from_fn_with_state(
                    general_limit,
                    enforce_rate_limit::<MemoryRateLimiter>,
                )),
        )
        .with_state(state)
}
