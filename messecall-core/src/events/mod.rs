//! Message system for the dashboard's event-driven architecture.
//!
//! # Message Flow
//!
//! 1. Caller sends `DashboardCommand` -> `Coordinator`
//! 2. `Coordinator` asks the owning component to issue a request and spawns
//!    the network call
//! 3. The network task sends a `Completion` -> `Coordinator`
//! 4. `Coordinator` applies the completion and publishes a `DashboardSnapshot`
//!
//! Network tasks never touch component state; they only report results.

pub mod channels;
pub mod types;

pub use channels::{
    CommandReceiver, CommandSender, CompletionReceiver, CompletionSender, DEFAULT_CHANNEL_BUFFER,
    SnapshotReceiver, SnapshotSender, command_channel, completion_channel, snapshot_channel,
};

pub use types::{Completion, DashboardCommand, OrganizationId, PublicEventsTicket};
