//! Per-operation status tracking.

/// Status of one asynchronous operation.
///
/// Each component owns the status of its own operation; it is never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationStatus {
    /// Nothing has been issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request succeeded.
    Succeeded(String),
    /// The last request failed.
    Failed(String),
}

impl OperationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, OperationStatus::Pending)
    }

    /// The message attached to a settled status.
    pub fn message(&self) -> Option<&str> {
        match self {
            OperationStatus::Succeeded(message) | OperationStatus::Failed(message) => {
                Some(message)
            }
            OperationStatus::Idle | OperationStatus::Pending => None,
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Idle => write!(f, "idle"),
            OperationStatus::Pending => write!(f, "pending"),
            OperationStatus::Succeeded(message) => write!(f, "succeeded: {message}"),
            OperationStatus::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}
