//! Profile operations with stable error codes.

use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::context::RequestContext;
use crate::domain::entities::Profile;
use crate::domain::repositories::{ProfileRepository, RepositoryError};
use crate::error::{AppError, ErrorCode};

/// Service translating profile repository outcomes into [`AppError`]s.
pub struct ProfileService<R: ProfileRepository> {
    repository: Arc<R>,
}

impl<R: ProfileRepository> ProfileService<R> {
    /// Creates a new profile service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Retrieves the profile of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user has no profile.
    /// Returns [`AppError::DeadlineExceeded`] if a store call outlives the deadline.
    /// Returns [`AppError::StoreUnavailable`] on any other failure.
    pub async fn get_profile(
        &self,
        ctx: &RequestContext,
        user_id: i64,
    ) -> Result<Profile, AppError> {
        ctx.scope("get_profile", async {
            info!(user_id, "GetProfile");

            let profile = self.repository.get(ctx, user_id).await.map_err(|e| match e {
                RepositoryError::NotFound => {
                    info!(user_id, "Profile not found");
                    AppError::not_found(ErrorCode::ProfileNotFound, json!({ "user_id": user_id }))
                }
                RepositoryError::Deadline(deadline) => AppError::from(deadline),
                other => {
                    error!(user_id, error = %other, "GetProfile failed");
                    AppError::store_unavailable(
                        ErrorCode::GetProfileFailed,
                        json!({ "user_id": user_id }),
                    )
                }
            })?;

            info!(user_id, username = %profile.username, "GetProfile done");
            Ok(profile)
        })
        .await
    }

    /// Creates `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] if the user already has a profile.
    /// Returns [`AppError::StoreUnavailable`] on any other failure.
    pub async fn create_profile(
        &self,
        ctx: &RequestContext,
        profile: Profile,
    ) -> Result<(), AppError> {
        ctx.scope("create_profile", async {
            let user_id = profile.user_id;
            info!(user_id, username = %profile.username, "CreateProfile");

            self.repository.create(ctx, profile).await.map_err(|e| match e {
                RepositoryError::Conflict { constraint } => {
                    info!(user_id, ?constraint, "Profile already exists");
                    AppError::already_exists(
                        ErrorCode::CreateProfileFailed,
                        json!({ "user_id": user_id }),
                    )
                }
                RepositoryError::Deadline(deadline) => AppError::from(deadline),
                other => {
                    error!(user_id, error = %other, "CreateProfile failed");
                    AppError::store_unavailable(
                        ErrorCode::CreateProfileFailed,
                        json!({ "user_id": user_id }),
                    )
                }
            })
        })
        .await
    }

    /// Applies the non-empty fields of `patch` to the profile of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store rejects the update.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        patch: Profile,
    ) -> Result<(), AppError> {
        ctx.scope("update_profile", async {
            info!(user_id, "UpdateProfile");

            self.repository.update(ctx, user_id, patch).await.map_err(|e| match e {
                RepositoryError::Deadline(deadline) => AppError::from(deadline),
                other => {
                    error!(user_id, error = %other, "UpdateProfile failed");
                    AppError::store_unavailable(
                        ErrorCode::UpdateProfileFailed,
                        json!({ "user_id": user_id }),
                    )
                }
            })
        })
        .await
    }

    /// Deletes the profile of `user_id`. A missing profile is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store rejects the delete.
    pub async fn delete_profile(&self, ctx: &RequestContext, user_id: i64) -> Result<(), AppError> {
        ctx.scope("delete_profile", async {
            info!(user_id, "DeleteProfile");

            self.repository.delete(ctx, user_id).await.map_err(|e| match e {
                RepositoryError::Deadline(deadline) => AppError::from(deadline),
                other => {
                    error!(user_id, error = %other, "DeleteProfile failed");
                    AppError::store_unavailable(
                        ErrorCode::DeleteProfileFailed,
                        json!({ "user_id": user_id }),
                    )
                }
            })
        })
        .await
    }
}
