//! Inbound account requests.

use serde::Deserialize;
use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, ErrorCode};

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Request to log in with an email and password.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

impl RegisterRequest {
    /// Validates the request, reporting failures under the register code.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| validation_error(ErrorCode::RegisterRequest, &e))
    }
}

impl LoginRequest {
    /// Validates the request, reporting failures under the login code.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| validation_error(ErrorCode::LoginRequest, &e))
    }
}

/// Flattens field errors into `{"fields": {"email": ["Invalid email format"]}}`.
fn validation_error(code: ErrorCode, errors: &ValidationErrors) -> AppError {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), json!(messages))
        })
        .collect();

    AppError::validation(code, json!({ "fields": fields }))
}
