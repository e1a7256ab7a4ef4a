//! SwapRequestSubmitter component.
//!
//! The SwapRequestSubmitter is responsible for:
//! - Parsing raw form input into a [`SwapRequestCreate`]
//! - Refusing a submission while another one is in flight
//! - Tracking the submission status shown to the user
//!
//! Parsing is deliberately lenient: user-id segments that are not integers
//! are dropped, and an empty candidate list is still submitted. The backend
//! decides whether the swap makes sense.

use crate::backend::{BackendError, DashboardBackend};
use crate::status::OperationStatus;
use messecall_sdk::objects::{SwapRequestCreate, SwapRequestCreated};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Message shown when the backend did not accept the request.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Request could not be created.";

/// Reasons a submission is refused before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapInputError {
    #[error("Assignment ID must be a positive integer.")]
    InvalidAssignmentId(String),

    #[error("A swap request is already being submitted.")]
    Busy,
}

/// What a call to [`SwapRequestSubmitter::submit`] ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The backend created the swap request with this id.
    Created(i64),
    /// The request was sent and failed.
    Failed,
    /// Nothing was sent.
    Refused(SwapInputError),
    /// A completion arrived with no submission in flight; state is unchanged.
    Ignored,
}

/// Parse a comma-separated list of user ids.
///
/// Each segment is trimmed and parsed as an integer; segments that do not
/// parse are dropped. Order and duplicates are kept.
pub fn parse_user_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|segment| segment.trim().parse::<i64>().ok())
        .collect()
}

/// Parse the assignment id, which must be a positive integer.
pub fn parse_assignment_id(raw: &str) -> Result<i64, SwapInputError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(SwapInputError::InvalidAssignmentId(raw.to_owned())),
    }
}

/// Build the outbound request from raw form input.
pub fn parse_swap_request(
    raw_assignment_id: &str,
    raw_user_ids: &str,
) -> Result<SwapRequestCreate, SwapInputError> {
    Ok(SwapRequestCreate {
        assignment_id: parse_assignment_id(raw_assignment_id)?,
        requested_user_ids: parse_user_ids(raw_user_ids),
    })
}

/// Submits swap requests one at a time.
#[derive(Debug, Default)]
pub struct SwapRequestSubmitter {
    status: OperationStatus,
    in_flight: bool,
}

impl SwapRequestSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission.
    ///
    /// On success the status becomes pending and the caller must send the
    /// returned payload exactly once, then report back through
    /// [`complete`](Self::complete). While a submission is in flight this
    /// returns [`SwapInputError::Busy`] and leaves the status alone.
    pub fn begin(
        &mut self,
        raw_assignment_id: &str,
        raw_user_ids: &str,
    ) -> Result<SwapRequestCreate, SwapInputError> {
        if self.in_flight {
            debug!("Swap request already in flight, ignoring submit");
            return Err(SwapInputError::Busy);
        }

        match parse_swap_request(raw_assignment_id, raw_user_ids) {
            Ok(payload) => {
                self.status = OperationStatus::Pending;
                self.in_flight = true;
                Ok(payload)
            }
            Err(e) => {
                debug!(raw_assignment_id, "Refusing swap request with invalid input");
                self.status = OperationStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Apply the outcome of the submission started by [`begin`](Self::begin).
    pub fn complete(&mut self, result: Result<SwapRequestCreated, BackendError>) -> SubmissionOutcome {
        if !self.in_flight {
            debug!("Ignoring swap request completion with nothing in flight");
            return SubmissionOutcome::Ignored;
        }
        self.in_flight = false;

        match result {
            Ok(created) => {
                info!(swap_request_id = created.id, "Swap request created");
                self.status = OperationStatus::Succeeded(format!("Request #{} created.", created.id));
                SubmissionOutcome::Created(created.id)
            }
            Err(e) => {
                // The backend detail stays in the log.
                warn!(error = %e, kind = ?e.kind, "Failed to create swap request");
                self.status = OperationStatus::Failed(SUBMISSION_FAILED_MESSAGE.to_owned());
                SubmissionOutcome::Failed
            }
        }
    }

    /// Parse, send and settle in one step.
    pub async fn submit(
        &mut self,
        backend: &dyn DashboardBackend,
        raw_assignment_id: &str,
        raw_user_ids: &str,
    ) -> SubmissionOutcome {
        let payload = match self.begin(raw_assignment_id, raw_user_ids) {
            Ok(payload) => payload,
            Err(e) => return SubmissionOutcome::Refused(e),
        };
        let result = backend.create_swap_request(&payload).await;
        self.complete(result)
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    /// Whether the submit control should be disabled.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
