//! Domain error kinds and their stable caller-facing codes.
//!
//! Every caller-facing operation returns either success or exactly one
//! [`AppError`]. The variant is the error *kind*; the embedded [`ErrorCode`]
//! is the stable numeric code and message the transport layer renders.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Stable numeric error codes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    GetProfileFailed,
    UpdateProfileFailed,
    DeleteProfileFailed,
    CreateProfileFailed,
    ProfileNotFound,
    EmailIsRegistered,
    RegisterGetUserFailed,
    RegisterInternal,
    RegisterRequest,
    LoginNoUser,
    LoginInternal,
    LoginRequest,
    PasswordMismatch,
    AuthFailed,
    TokenExpired,
    DeadlineExceeded,
}

impl ErrorCode {
    /// Numeric wire value.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::GetProfileFailed => 100001,
            Self::UpdateProfileFailed => 100002,
            Self::DeleteProfileFailed => 100003,
            Self::CreateProfileFailed => 100004,
            Self::ProfileNotFound => 100005,
            Self::EmailIsRegistered => 200001,
            Self::RegisterGetUserFailed => 200002,
            Self::RegisterInternal => 200003,
            Self::RegisterRequest => 200004,
            Self::LoginNoUser => 200005,
            Self::LoginInternal => 200006,
            Self::LoginRequest => 200007,
            Self::PasswordMismatch => 200008,
            Self::AuthFailed => 200009,
            Self::TokenExpired => 200010,
            Self::DeadlineExceeded => 900001,
        }
    }

    /// Human readable message paired with the code.
    pub fn message(self) -> &'static str {
        match self {
            Self::GetProfileFailed => "Get profile failed.",
            Self::UpdateProfileFailed => "Update profile failed.",
            Self::DeleteProfileFailed => "Delete profile failed.",
            Self::CreateProfileFailed => "Create profile failed.",
            Self::ProfileNotFound => "Profile not found.",
            Self::EmailIsRegistered => "Register failed, email has been registered.",
            Self::RegisterGetUserFailed => "Register failed, query db failed.",
            Self::RegisterInternal => "Register failed, internal server error.",
            Self::RegisterRequest => "Register failed, bad request.",
            Self::LoginNoUser => "Login failed, no such user.",
            Self::LoginInternal => "Login failed, internal server error.",
            Self::LoginRequest => "Login failed, bad request.",
            Self::PasswordMismatch => "Login failed, password mismatch.",
            Self::AuthFailed => "Auth failed, invalid token.",
            Self::TokenExpired => "Auth failed, login status expired.",
            Self::DeadlineExceeded => "Request deadline exceeded.",
        }
    }
}

/// Serializable error record handed to the transport layer.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: i32,
    pub kind: &'static str,
    pub message: &'static str,
    pub details: Value,
}

/// Application-level error kinds.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", .code.message())]
    Validation { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    NotFound { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    AlreadyExists { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    CredentialMismatch { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    TokenInvalid { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    TokenExpired { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    StoreUnavailable { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    DeadlineExceeded { code: ErrorCode, details: Value },
    #[error("{}", .code.message())]
    Internal { code: ErrorCode, details: Value },
}

impl AppError {
    pub fn validation(code: ErrorCode, details: Value) -> Self {
        Self::Validation { code, details }
    }
    pub fn not_found(code: ErrorCode, details: Value) -> Self {
        Self::NotFound { code, details }
    }
    pub fn already_exists(code: ErrorCode, details: Value) -> Self {
        Self::AlreadyExists { code, details }
    }
    pub fn credential_mismatch(code: ErrorCode, details: Value) -> Self {
        Self::CredentialMismatch { code, details }
    }
    pub fn token_invalid(code: ErrorCode, details: Value) -> Self {
        Self::TokenInvalid { code, details }
    }
    pub fn token_expired(code: ErrorCode, details: Value) -> Self {
        Self::TokenExpired { code, details }
    }
    pub fn store_unavailable(code: ErrorCode, details: Value) -> Self {
        Self::StoreUnavailable { code, details }
    }
    pub fn deadline_exceeded(details: Value) -> Self {
        Self::DeadlineExceeded {
            code: ErrorCode::DeadlineExceeded,
            details,
        }
    }
    pub fn internal(code: ErrorCode, details: Value) -> Self {
        Self::Internal { code, details }
    }

    /// The stable code carried by this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. }
            | Self::NotFound { code, .. }
            | Self::AlreadyExists { code, .. }
            | Self::CredentialMismatch { code, .. }
            | Self::TokenInvalid { code, .. }
            | Self::TokenExpired { code, .. }
            | Self::StoreUnavailable { code, .. }
            | Self::DeadlineExceeded { code, .. }
            | Self::Internal { code, .. } => *code,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::AlreadyExists { .. } => "already_exists",
            Self::CredentialMismatch { .. } => "credential_mismatch",
            Self::TokenInvalid { .. } => "token_invalid",
            Self::TokenExpired { .. } => "token_expired",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
            Self::Internal { .. } => "internal_error",
        }
    }

    fn details(&self) -> &Value {
        match self {
            Self::Validation { details, .. }
            | Self::NotFound { details, .. }
            | Self::AlreadyExists { details, .. }
            | Self::CredentialMismatch { details, .. }
            | Self::TokenInvalid { details, .. }
            | Self::TokenExpired { details, .. }
            | Self::StoreUnavailable { details, .. }
            | Self::DeadlineExceeded { details, .. }
            | Self::Internal { details, .. } => details,
        }
    }

    /// Builds the record the transport layer serializes for callers.
    pub fn body(&self) -> ErrorBody {
        let code = self.code();
        ErrorBody {
            code: code.as_i32(),
            kind: self.kind(),
            message: code.message(),
            details: self.details().clone(),
        }
    }
}
