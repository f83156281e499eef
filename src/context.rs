//! Per-request trace and cancellation metadata.
//!
//! A [`RequestContext`] is created by whatever accepts the request and passed
//! explicitly into every service call. It carries the correlation fields that
//! appear on every log line of that call and an optional deadline.

use serde_json::json;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{Instrument, Span, info_span};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    /// Authenticated user, 0 when anonymous.
    pub user_id: i64,
    pub deadline: Option<Instant>,
}

impl RequestContext {
    /// Anonymous context with a fresh random request id and no deadline.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            user_id: 0,
            deadline: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    /// Bounds every call made under this context to `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn span(&self) -> Span {
        info_span!("request", request_id = %self.request_id, user_id = self.user_id)
    }

    /// Runs `operation` inside this context's span.
    ///
    /// The deadline is not applied here; it bounds individual store and cache
    /// calls through [`RequestContext::bounded`].
    pub async fn scope<T, F>(&self, operation: &'static str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let span = info_span!(
            "request",
            request_id = %self.request_id,
            user_id = self.user_id,
            operation
        );
        fut.instrument(span).await
    }

    /// Bounds a single store or cache call by the deadline.
    ///
    /// A single attempt is made; when the deadline passes the call is
    /// dropped, which cancels it.
    pub async fn bounded<F>(
        &self,
        operation: &'static str,
        fut: F,
    ) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut).await.map_err(|_| {
                tracing::warn!(
                    request_id = %self.request_id,
                    operation,
                    "Request deadline exceeded"
                );
                DeadlineExceeded { operation }
            }),
            None => Ok(fut.await),
        }
    }
}

/// A call was cut off by the request deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request deadline exceeded during {operation}")]
pub struct DeadlineExceeded {
    pub operation: &'static str,
}

impl From<DeadlineExceeded> for AppError {
    fn from(e: DeadlineExceeded) -> Self {
        AppError::deadline_exceeded(json!({ "operation": e.operation }))
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
