//! Channel factories and handles.
//!
//! Provides factory functions for the command, completion and snapshot
//! channels that connect the coordinator to its callers and to its own
//! network tasks.

use super::types::{Completion, DashboardCommand};
use crate::snapshot::DashboardSnapshot;
use tokio::sync::{mpsc, watch};

/// Default buffer size for command and completion channels.
///
/// A dashboard only ever has a handful of requests outstanding.
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// Sender handle for DashboardCommand messages.
pub type CommandSender = mpsc::Sender<DashboardCommand>;
/// Receiver handle for DashboardCommand messages.
pub type CommandReceiver = mpsc::Receiver<DashboardCommand>;

/// Sender handle for Completion messages.
pub type CompletionSender = mpsc::Sender<Completion>;
/// Receiver handle for Completion messages.
pub type CompletionReceiver = mpsc::Receiver<Completion>;

/// Sender handle for published snapshots.
pub type SnapshotSender = watch::Sender<DashboardSnapshot>;
/// Receiver handle for published snapshots.
pub type SnapshotReceiver = watch::Receiver<DashboardSnapshot>;

/// Create a new DashboardCommand channel.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new Completion channel.
///
/// The coordinator keeps the receiver; each network task gets a clone of
/// the sender.
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new snapshot channel seeded with an empty snapshot.
pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    watch::channel(DashboardSnapshot::default())
}
