//! Registration, login, and session authentication.

use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::application::session::{SessionAuthority, SessionError, SessionIdentity};
use crate::context::RequestContext;
use crate::domain::entities::{Account, NewAccount};
use crate::domain::repositories::{AccountRepository, RepositoryError};
use crate::error::{AppError, ErrorCode};

/// Service implementing the account business rules.
///
/// Credentials are compared verbatim; there is no hashing step.
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
    sessions: SessionAuthority,
}

impl<R: AccountRepository> AccountService<R> {
    /// Creates a new account service.
    pub fn new(repository: Arc<R>, sessions: SessionAuthority) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// Registers `email` with `password`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] if the email is taken.
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be queried;
    /// an outage is never read as "email available".
    /// Returns [`AppError::DeadlineExceeded`] if a store call outlives the deadline.
    pub async fn register(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<Account, AppError> {
        ctx.scope("register", async {
            info!(email, "Register");

            let lookup = ctx
                .bounded("find_by_email", self.repository.find_by_email(email))
                .await?;
            match lookup {
                Ok(Some(_)) => {
                    info!(email, "Email already registered");
                    return Err(AppError::already_exists(
                        ErrorCode::EmailIsRegistered,
                        json!({ "email": email }),
                    ));
                }
                Ok(None) => {}
                Err(e) => {
                    error!(email, error = %e, "Account lookup failed");
                    return Err(AppError::store_unavailable(
                        ErrorCode::RegisterInternal,
                        json!({ "email": email }),
                    ));
                }
            }

            let account = ctx
                .bounded("insert", self.repository.insert(NewAccount::new(email, password)))
                .await?
                .map_err(|e| match e {
                    RepositoryError::Conflict { .. } => AppError::already_exists(
                        ErrorCode::EmailIsRegistered,
                        json!({ "email": email }),
                    ),
                    other => {
                        error!(email, error = %other, "Account insert failed");
                        AppError::store_unavailable(
                            ErrorCode::RegisterInternal,
                            json!({ "email": email }),
                        )
                    }
                })?;

            info!(user_id = account.id, "Account registered");
            Ok(account)
        })
        .await
    }

    /// Checks credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account uses `email`.
    /// Returns [`AppError::CredentialMismatch`] if the password differs.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        ctx.scope("login", async {
            info!(email, "Login");

            let lookup = ctx
                .bounded("find_by_email", self.repository.find_by_email(email))
                .await?;
            let account = match lookup {
                Ok(Some(account)) => account,
                Ok(None) => {
                    info!(email, "Login for unknown email");
                    return Err(AppError::not_found(
                        ErrorCode::LoginNoUser,
                        json!({ "email": email }),
                    ));
                }
                Err(e) => {
                    error!(email, error = %e, "Account lookup failed");
                    return Err(AppError::store_unavailable(
                        ErrorCode::LoginInternal,
                        json!({ "email": email }),
                    ));
                }
            };

            if !account.password_matches(password) {
                warn!(user_id = account.id, "Password mismatch");
                return Err(AppError::credential_mismatch(
                    ErrorCode::PasswordMismatch,
                    json!({ "email": email }),
                ));
            }

            let token = self.sessions.issue(account.id, email).map_err(|e| {
                error!(user_id = account.id, error = %e, "Token signing failed");
                AppError::internal(ErrorCode::LoginInternal, json!({}))
            })?;

            info!(user_id = account.id, "Login succeeded");
            Ok(token)
        })
        .await
    }

    /// Resolves a session token to the identity it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TokenExpired`] for an authentic but expired token.
    /// Returns [`AppError::TokenInvalid`] for anything else that fails verification.
    pub async fn authenticate(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<SessionIdentity, AppError> {
        ctx.scope("authenticate", async {
            match self.sessions.verify(token) {
                Ok(identity) => {
                    info!(user_id = identity.user_id, "Authenticated");
                    Ok(identity)
                }
                Err(SessionError::Expired) => {
                    info!("Session expired");
                    Err(AppError::token_expired(ErrorCode::TokenExpired, json!({})))
                }
                Err(e) => {
                    warn!(error = %e, "Session token rejected");
                    Err(AppError::token_invalid(ErrorCode::AuthFailed, json!({})))
                }
            }
        })
        .await
    }

    /// Sessions hold no server-side state; the caller discards the token.
    pub async fn logout(&self, ctx: &RequestContext) {
        ctx.span().in_scope(|| info!("Logout"));
    }
}
