//! Business logic services for the application layer.

pub mod account_service;
pub mod profile_service;

pub use account_service::AccountService;
pub use profile_service::ProfileService;
