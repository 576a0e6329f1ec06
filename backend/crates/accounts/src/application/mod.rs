//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
pub mod delete_account;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod token;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AccountsConfig;
pub use delete_account::{DeleteAccountInput, DeleteAccountUseCase};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use profile::{GetProfileUseCase, ProfileUpdateInput, UpdateProfileUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token::{TokenClaims, TokenError, TokenIssuer};
