#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![forbid(unsafe_code)]

pub mod backend;
pub mod components;
pub mod events;
pub mod snapshot;
pub mod status;

pub use backend::{BackendError, DashboardBackend, FailureKind};
pub use components::Coordinator;
pub use snapshot::{DashboardSnapshot, UpcomingEvent};
pub use status::OperationStatus;
