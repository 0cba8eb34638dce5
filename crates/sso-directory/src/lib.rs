//! # sso-directory
//!
//! User directory abstraction for agent accounts.
//!
//! The login flow resolves remote identities to local accounts through the
//! [`UserDirectory`] trait. The real backend lives elsewhere; this crate
//! ships [`InMemoryUserDirectory`] for local runs and tests.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod directory;
pub mod error;
pub mod memory;
pub mod password;

pub use directory::UserDirectory;
pub use error::{DirectoryError, DirectoryResult};
pub use memory::InMemoryUserDirectory;
pub use password::{PasswordHasherService, PasswordPolicy};
