//! Gateway — boundary to the external task and validation backend.
//!
//! DESIGN
//! ======
//! The backend owns tasks, scoring and coin bookkeeping. This module only
//! translates the registry into a validation request and the response into an
//! [`Outcome`]. `ShapeBackend` is the seam: [`HttpBackend`] talks to the real
//! service, tests substitute in-memory mocks.
//!
//! ERROR HANDLING
//! ==============
//! An empty canvas is rejected locally before any request is built. A 401 is
//! reported as [`GatewayError::Unauthorized`] and ends the session; every
//! other failure is transient and never retried automatically.

pub mod http;
pub mod types;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub use http::HttpBackend;
pub use types::{TargetShape, Task, TaskId, UserStats, ValidateRequest, ValidateResponse};

use crate::editor::Notice;
use crate::error::ErrorCode;
use crate::registry::Registry;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to the task backend.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The backend rejected our credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status other than 401.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Async access to the task backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ShapeBackend: Send + Sync {
    /// Fetch the next task to build.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport, status or decode failure.
    async fn fetch_task(&self) -> Result<Task, GatewayError>;

    /// Fetch the user's coin balance and progress.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport, status or decode failure.
    async fn fetch_user_stats(&self) -> Result<UserStats, GatewayError>;

    /// Ask the backend whether the arrangement satisfies the task.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport, status or decode failure.
    async fn validate(&self, request: &ValidateRequest) -> Result<ValidateResponse, GatewayError>;
}

// =============================================================================
// REQUEST / OUTCOME
// =============================================================================

/// Build the validation request for `task_id`, or `None` if there is nothing
/// on the canvas to submit.
#[must_use]
pub fn build_request(task_id: &TaskId, registry: &Registry) -> Option<ValidateRequest> {
    if registry.is_empty() {
        return None;
    }
    Some(ValidateRequest { task_id: task_id.clone(), shapes: registry.to_serializable() })
}

/// What the backend decided about a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The arrangement matches the task; the task is complete.
    Accepted { message: String, award: Option<i64> },
    /// The arrangement does not match; keep editing.
    Rejected { message: String },
}

impl From<ValidateResponse> for Outcome {
    fn from(response: ValidateResponse) -> Self {
        if response.valid {
            Self::Accepted { message: response.message, award: response.award }
        } else {
            Self::Rejected { message: response.message }
        }
    }
}

impl Outcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// User-facing notice for this outcome.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Accepted { message, award: Some(award) } => {
                Notice::success(format!("{message} You earned {award} coins!"))
            }
            Self::Accepted { message, award: None } => Notice::success(message.clone()),
            Self::Rejected { message } => Notice::error(format!("{message} Try again!")),
        }
    }
}
