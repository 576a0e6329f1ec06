//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, salted, fixed work factor)
//! - Rate limiting infrastructure
//! - Client address extraction

pub mod client;
pub mod password;
pub mod rate_limit;
