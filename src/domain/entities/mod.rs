//! Core domain entities representing the account data model.
//!
//! # Entity Types
//!
//! - [`Account`] - Login credentials, owned by the credential store
//! - [`Profile`] - User profile record, cached on read
//!
//! # Design Pattern
//!
//! Creation input is kept separate from stored records:
//! - `NewAccount` - For registering accounts (id assigned by the store)
//! - `ProfileChanges` - The typed set of present fields a profile write touches

pub mod account;
pub mod profile;

pub use account::{Account, NewAccount};
pub use profile::{BIRTHDAY_FORMAT, Profile, ProfileChanges, ProfileField, parse_birthday};
