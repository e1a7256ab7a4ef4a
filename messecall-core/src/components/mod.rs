//! Dashboard components.
//!
//! - `EventAggregator`: loads the internal event list once per session
//! - `PublicEventResolver`: loads the public event list of the selected
//!   organization, discarding responses for superseded identifiers
//! - `SwapRequestSubmitter`: parses and submits swap requests one at a time
//! - `Coordinator`: owns the organization identifier, routes commands and
//!   completions, publishes snapshots

pub mod aggregator;
pub mod coordinator;
pub mod resolver;
pub mod submitter;

pub use aggregator::EventAggregator;
pub use coordinator::Coordinator;
pub use resolver::PublicEventResolver;
pub use submitter::{
    SUBMISSION_FAILED_MESSAGE, SubmissionOutcome, SwapInputError, SwapRequestSubmitter,
    parse_assignment_id, parse_swap_request, parse_user_ids,
};
