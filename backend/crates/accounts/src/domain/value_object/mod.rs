//! Value Objects

pub mod display_name;
pub mod email;
pub mod password;
pub mod public_id;

pub use display_name::DisplayName;
pub use email::Email;
pub use kernel::id::AccountId;
pub use password::{AccountPassword, RawPassword};
pub use public_id::PublicId;
