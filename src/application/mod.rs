//! Application layer: business rules over the repository traits.
//!
//! Services receive a [`crate::context::RequestContext`] on every call and
//! translate repository outcomes into [`crate::error::AppError`]s with stable
//! codes.
//!
//! # Available Services
//!
//! - [`services::account_service::AccountService`] - Register, login, authenticate, logout
//! - [`services::profile_service::ProfileService`] - Profile CRUD
//! - [`session::SessionAuthority`] - Session token issue and verification

pub mod services;
pub mod session;
