//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AccountAppState;
pub use middleware::{Authenticated, RateLimitState, enforce_rate_limit, require_account};
pub use router::{accounts_router, accounts_router_generic};
