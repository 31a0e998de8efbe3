//! Session — one user working through tasks in one editor.
//!
//! DESIGN
//! ======
//! A session pairs an [`Editor`] with a [`ShapeBackend`]. Loading a task
//! resets the editor. Submission is split into `begin_submit` and
//! `finish_submit` so a host can keep the UI responsive while the request is
//! outstanding; `submit` runs both around the backend call. Only one
//! submission may be outstanding at a time.
//!
//! If the `submit` future is dropped while the backend call is pending (a
//! host timeout, navigation away), the in-flight mark is released so the
//! user can submit again. Hosts driving the split API call
//! [`Session::abort_submit`] for the same effect.
//!
//! A 401 from any endpoint moves the session to [`Phase::Ended`]; nothing but
//! read access works after that.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::config::CanvasSettings;
use crate::editor::{Editor, Notice};
use crate::error::ErrorCode;
use crate::gateway::{self, GatewayError, Outcome, ShapeBackend, Task, UserStats, ValidateRequest, ValidateResponse};

/// Where the session is in the task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No task loaded yet.
    AwaitingTask,
    /// A task is loaded and the user is building.
    Editing,
    /// The backend accepted the current task; load the next one.
    Completed,
    /// Authorization failed; the session is over.
    Ended,
}

/// Why a submission did not produce an [`Outcome`].
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("nothing on the canvas to submit")]
    EmptyCanvas,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("no task loaded")]
    NoTask,
    #[error("task already completed")]
    TaskCompleted,
    #[error("session ended")]
    SessionEnded,
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl ErrorCode for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCanvas => "E_EMPTY_CANVAS",
            Self::InFlight => "E_IN_FLIGHT",
            Self::NoTask => "E_NO_TASK",
            Self::TaskCompleted => "E_TASK_COMPLETED",
            Self::SessionEnded => "E_SESSION_ENDED",
            Self::Gateway(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.retryable(),
            _ => false,
        }
    }
}

impl SubmitError {
    /// User-facing notice for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::EmptyCanvas => Notice::error("Please add at least one shape!"),
            Self::InFlight => Notice::info("Still checking your shapes..."),
            Self::NoTask => Notice::error("No task loaded"),
            Self::TaskCompleted => Notice::info("Task already complete! Load the next one."),
            Self::SessionEnded | Self::Gateway(GatewayError::Unauthorized) => Notice::error("Please log in again"),
            Self::Gateway(_) => Notice::error("Validation failed"),
        }
    }
}

pub struct Session<B> {
    backend: B,
    editor: Editor,
    task: Option<Task>,
    phase: Phase,
    in_flight: Arc<AtomicBool>,
    stats: Option<UserStats>,
}

impl<B: ShapeBackend> Session<B> {
    #[must_use]
    pub fn new(backend: B, settings: &CanvasSettings) -> Self {
        Self {
            backend,
            editor: Editor::new(settings),
            task: None,
            phase: Phase::AwaitingTask,
            in_flight: Arc::new(AtomicBool::new(false)),
            stats: None,
        }
    }

    // --- Backend calls ---

    /// Fetch the next task and reset the editor for it.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; a 401 also ends the session.
    pub async fn load_task(&mut self) -> Result<&Task, GatewayError> {
        if self.phase == Phase::Ended {
            return Err(GatewayError::Unauthorized);
        }
        let fetched = self.backend.fetch_task().await;
        let task = fetched.map_err(|e| self.observe(e))?;
        info!(task_id = %task.id, name = %task.name, targets = task.target_shapes.len(), "session: task loaded");
        self.editor.reset();
        self.phase = Phase::Editing;
        Ok(self.task.insert(task))
    }

    /// Refresh the cached coin balance.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; a 401 also ends the session.
    pub async fn refresh_stats(&mut self) -> Result<&UserStats, GatewayError> {
        if self.phase == Phase::Ended {
            return Err(GatewayError::Unauthorized);
        }
        let fetched = self.backend.fetch_user_stats().await;
        let stats = fetched.map_err(|e| self.observe(e))?;
        Ok(self.stats.insert(stats))
    }

    /// Submit the current arrangement for validation.
    ///
    /// On acceptance the coin balance is refreshed; a failure to refresh is
    /// logged and does not affect the outcome.
    ///
    /// # Errors
    ///
    /// See [`Session::begin_submit`] and [`Session::finish_submit`].
    pub async fn submit(&mut self) -> Result<Outcome, SubmitError> {
        let request = self.begin_submit()?;
        let response = {
            let _release = InFlightRelease(Arc::clone(&self.in_flight));
            self.backend.validate(&request).await
        };
        let outcome = self.finish_submit(response)?;
        if outcome.is_accepted() {
            if let Err(e) = self.refresh_stats().await {
                warn!(error = %e, "session: stats refresh after accept failed");
            }
        }
        Ok(outcome)
    }

    // --- Split submission ---

    /// Check preconditions, mark a submission in flight, and build its request.
    ///
    /// # Errors
    ///
    /// Returns `SessionEnded`, `NoTask`, `TaskCompleted`, `InFlight` or
    /// `EmptyCanvas` without contacting the backend.
    pub fn begin_submit(&mut self) -> Result<ValidateRequest, SubmitError> {
        match self.phase {
            Phase::Ended => return Err(SubmitError::SessionEnded),
            Phase::AwaitingTask => return Err(SubmitError::NoTask),
            Phase::Completed => return Err(SubmitError::TaskCompleted),
            Phase::Editing => {}
        }
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        let task = self.task.as_ref().ok_or(SubmitError::NoTask)?;
        let request = gateway::build_request(&task.id, self.editor.registry()).ok_or(SubmitError::EmptyCanvas)?;
        self.in_flight.store(true, Ordering::SeqCst);
        info!(task_id = %task.id, shapes = request.shapes.len(), "session: submitting");
        Ok(request)
    }

    /// Record the backend's answer to the outstanding submission.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Gateway` for transport or status failures. The
    /// editor is untouched, so the user can simply submit again.
    pub fn finish_submit(&mut self, response: Result<ValidateResponse, GatewayError>) -> Result<Outcome, SubmitError> {
        self.in_flight.store(false, Ordering::SeqCst);
        let outcome = Outcome::from(response.map_err(|e| self.observe(e))?);
        if outcome.is_accepted() {
            self.phase = Phase::Completed;
        }
        info!(accepted = outcome.is_accepted(), "session: submission answered");
        Ok(outcome)
    }

    /// Give up on the outstanding submission without an answer. The editor
    /// is untouched and the next submit proceeds normally.
    pub fn abort_submit(&mut self) {
        if self.in_flight.swap(false, Ordering::SeqCst) {
            info!("session: submission abandoned");
        }
    }

    fn observe(&mut self, error: GatewayError) -> GatewayError {
        if matches!(error, GatewayError::Unauthorized) {
            warn!("session: unauthorized; ending session");
            self.phase = Phase::Ended;
            self.in_flight.store(false, Ordering::SeqCst);
        } else {
            warn!(error = %error, code = error.error_code(), "session: backend call failed");
        }
        error
    }

    // --- Accessors ---

    #[must_use]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Mutable editor access. Edits are still accepted while a submission is
    /// in flight; the request already carries its own copy of the shapes.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    #[must_use]
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stats(&self) -> Option<&UserStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Clears the in-flight mark when dropped, including when the owning future
/// is cancelled mid-await.
struct InFlightRelease(Arc<AtomicBool>);

impl Drop for InFlightRelease {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
