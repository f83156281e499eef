//! Validated request shapes for callers above the core.

pub mod account;

pub use account::{LoginRequest, RegisterRequest};
