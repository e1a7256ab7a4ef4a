//! Coordinator.
//!
//! The Coordinator is responsible for:
//! - Owning the organization identifier and all component state
//! - Turning `DashboardCommand`s into component requests and spawning the
//!   matching network calls
//! - Applying `Completion`s to the component that issued them
//! - Publishing a `DashboardSnapshot` after every change
//!
//! Network tasks only perform I/O and report back over the completion
//! channel, so all state changes happen on the coordinator's own task.

use crate::backend::DashboardBackend;
use crate::components::{EventAggregator, PublicEventResolver, SwapInputError, SwapRequestSubmitter};
use crate::events::{
    CommandReceiver, Completion, CompletionReceiver, CompletionSender, DashboardCommand,
    SnapshotSender, completion_channel,
};
use crate::snapshot::{DashboardSnapshot, next_upcoming};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info};

/// Composes the three dashboard components.
pub struct Coordinator {
    backend: Arc<dyn DashboardBackend>,
    organization_id: String,
    aggregator: EventAggregator,
    resolver: PublicEventResolver,
    submitter: SwapRequestSubmitter,
    completion_tx: CompletionSender,
    completion_rx: CompletionReceiver,
    /// Spawned network tasks whose completion has not been applied yet.
    outstanding: usize,
}

impl Coordinator {
    /// Create a new Coordinator.
    ///
    /// # Arguments
    ///
    /// * `backend` - Backend the network tasks call
    /// * `organization_id` - Initial organization identifier (may be blank)
    pub fn new(backend: Arc<dyn DashboardBackend>, organization_id: impl Into<String>) -> Self {
        let (completion_tx, completion_rx) = completion_channel();
        Self {
            backend,
            organization_id: organization_id.into(),
            aggregator: EventAggregator::new(),
            resolver: PublicEventResolver::new(),
            submitter: SwapRequestSubmitter::new(),
            completion_tx,
            completion_rx,
            outstanding: 0,
        }
    }

    /// Issue the session's initial loads: the internal events and the public
    /// events of the initial organization.
    pub fn start(&mut self) {
        if self.aggregator.begin() {
            let backend = self.backend.clone();
            self.spawn(async move { Completion::InternalEvents(backend.list_events().await) });
        }
        let organization_id = self.organization_id.clone();
        self.resolve_public_events(&organization_id);
    }

    /// Change the organization identifier.
    ///
    /// A new public-events request is issued only when the value actually
    /// changed, and never for a blank value.
    pub fn set_organization_id(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        if raw == self.organization_id {
            return;
        }
        debug!(from = %self.organization_id, to = %raw, "Organization id changed");
        self.organization_id = raw;
        let organization_id = self.organization_id.clone();
        self.resolve_public_events(&organization_id);
    }

    fn resolve_public_events(&mut self, raw: &str) {
        if let Some(ticket) = self.resolver.request(raw) {
            let backend = self.backend.clone();
            self.spawn(async move {
                let result = backend.list_public_events(&ticket.organization_id).await;
                Completion::PublicEvents { ticket, result }
            });
        }
    }

    /// Submit a swap request from raw form input.
    ///
    /// Returns the reason when nothing was sent (invalid input or a
    /// submission already in flight).
    pub fn submit_swap(
        &mut self,
        raw_assignment_id: &str,
        raw_user_ids: &str,
    ) -> Result<(), SwapInputError> {
        let payload = self.submitter.begin(raw_assignment_id, raw_user_ids)?;
        let backend = self.backend.clone();
        self.spawn(async move { Completion::SwapRequest(backend.create_swap_request(&payload).await) });
        Ok(())
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        let tx = self.completion_tx.clone();
        self.outstanding += 1;
        tokio::spawn(async move {
            // The receiver lives as long as the coordinator; a failed send
            // only means the coordinator is gone.
            let _ = tx.send(task.await).await;
        });
    }

    /// Handle one user command.
    pub fn handle(&mut self, command: DashboardCommand) {
        match command {
            DashboardCommand::SetOrganizationId(raw) => self.set_organization_id(raw),
            DashboardCommand::SubmitSwap {
                assignment_id,
                user_ids,
            } => {
                if let Err(e) = self.submit_swap(&assignment_id, &user_ids) {
                    debug!(error = %e, "Swap submission not sent");
                }
            }
        }
    }

    /// Route a completion to the component that issued it.
    pub fn apply(&mut self, completion: Completion) {
        self.outstanding = self.outstanding.saturating_sub(1);
        match completion {
            Completion::InternalEvents(result) => self.aggregator.complete(result),
            Completion::PublicEvents { ticket, result } => {
                self.resolver.complete(&ticket, result);
            }
            Completion::SwapRequest(result) => {
                self.submitter.complete(result);
            }
        }
    }

    /// Number of spawned requests not yet applied.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Wait for and apply every outstanding completion.
    pub async fn settle(&mut self) {
        while self.outstanding > 0 {
            match self.completion_rx.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn aggregator(&self) -> &EventAggregator {
        &self.aggregator
    }

    pub fn resolver(&self) -> &PublicEventResolver {
        &self.resolver
    }

    pub fn submitter(&self) -> &SwapRequestSubmitter {
        &self.submitter
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot_at(OffsetDateTime::now_utc())
    }

    /// Capture the current state, projecting the next event relative to `now`.
    pub fn snapshot_at(&self, now: OffsetDateTime) -> DashboardSnapshot {
        DashboardSnapshot {
            organization_id: self.organization_id.clone(),
            events: self.aggregator.events().to_vec(),
            events_loading: self.aggregator.is_loading(),
            public_events: self.resolver.events().to_vec(),
            public_scope: self.resolver.scope().cloned(),
            public_events_loading: self.resolver.is_loading(),
            swap_status: self.submitter.status().clone(),
            swap_in_flight: self.submitter.is_in_flight(),
            next_event: next_upcoming(self.aggregator.events(), now),
        }
    }

    /// Run the Coordinator until shutdown is signaled or the command channel
    /// closes with nothing left outstanding.
    pub async fn run(
        mut self,
        mut commands: CommandReceiver,
        snapshots: SnapshotSender,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        info!(organization_id = %self.organization_id, "Coordinator started");
        self.start();
        snapshots.send_replace(self.snapshot());

        let mut commands_open = true;
        loop {
            tokio::select! {
                biased;

                // Check for shutdown
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Coordinator received shutdown signal");
                        break;
                    }
                }

                // Apply network completions
                Some(completion) = self.completion_rx.recv() => {
                    self.apply(completion);
                }

                // Receive user commands
                command = commands.recv(), if commands_open => {
                    match command {
                        Some(command) => {
                            debug!(command = ?command, "Received DashboardCommand");
                            self.handle(command);
                        }
                        None => {
                            info!("Command channel closed");
                            commands_open = false;
                        }
                    }
                }
            }

            snapshots.send_replace(self.snapshot());

            if !commands_open && self.outstanding == 0 {
                break;
            }
        }

        info!("Coordinator shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::backend::testing::{Call, ScriptedBackend, created, event};
    use crate::events::{command_channel, snapshot_channel};
    use crate::status::OperationStatus;
    use messecall_sdk::objects::SwapRequestCreate;
    use time::macros::datetime;

    async fn wait_for_parked(backend: &ScriptedBackend, count: usize) {
        while backend.parked() < count {
            tokio::task::yield_now().await;
        }
    }

    fn setup(organization_id: &str) -> (Coordinator, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::default());
        (Coordinator::new(backend.clone(), organization_id), backend)
    }

    #[tokio::test]
    async fn test_start_issues_both_loads() {
        let (mut coordinator, backend) = setup("1");
        coordinator.start();
        wait_for_parked(&backend, 2).await;

        assert!(coordinator.snapshot().events_loading);
        backend.release_events(Ok(vec![event(1, "Hochamt", "2025-03-09T10:00:00")]));
        backend.release_public_events("1", Ok(vec![]));
        coordinator.settle().await;

        assert_eq!(
            backend.calls(),
            vec![Call::ListEvents, Call::ListPublicEvents("1".to_owned())]
        );
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.events.len(), 1);
        assert!(!snapshot.events_loading);
        assert!(snapshot.public_events.is_empty());
        assert!(!snapshot.public_events_loading);
    }

    #[tokio::test]
    async fn test_start_twice_loads_internal_events_once() {
        let (mut coordinator, backend) = setup("");
        coordinator.start();
        coordinator.start();
        wait_for_parked(&backend, 1).await;
        backend.release_events(Ok(vec![]));
        coordinator.settle().await;

        assert_eq!(backend.calls(), vec![Call::ListEvents]);
    }

    #[tokio::test]
    async fn test_failing_internal_fetch_degrades_to_empty() {
        let (mut coordinator, backend) = setup("");
        coordinator.start();
        wait_for_parked(&backend, 1).await;
        backend.release_events(Err(BackendError::rejected("API request failed")));
        coordinator.settle().await;

        let snapshot = coordinator.snapshot();
        assert!(snapshot.events.is_empty());
        assert!(!snapshot.events_loading);
        assert_eq!(snapshot.swap_status, OperationStatus::Idle);
    }

    #[tokio::test]
    async fn test_blank_organization_sends_no_public_request() {
        let (mut coordinator, backend) = setup("1");
        coordinator.set_organization_id("");
        coordinator.set_organization_id("   ");
        tokio::task::yield_now().await;

        assert!(backend.calls().is_empty());
        assert_eq!(coordinator.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_unchanged_organization_is_not_refetched() {
        let (mut coordinator, backend) = setup("1");
        coordinator.set_organization_id("2");
        coordinator.set_organization_id("2");
        wait_for_parked(&backend, 1).await;

        assert_eq!(backend.calls(), vec![Call::ListPublicEvents("2".to_owned())]);
    }

    #[tokio::test]
    async fn test_last_issued_organization_wins_out_of_order() {
        let (mut coordinator, backend) = setup("");
        coordinator.set_organization_id("1");
        coordinator.set_organization_id("2");
        coordinator.set_organization_id("3");
        wait_for_parked(&backend, 3).await;

        // Newest resolves first, the older ones straggle in afterwards.
        backend.release_public_events("3", Ok(vec![event(30, "Taize", "2025-03-10T19:00:00")]));
        backend.release_public_events("1", Ok(vec![event(10, "Hochamt", "2025-03-09T10:00:00")]));
        backend.release_public_events("2", Err(BackendError::transport("timed out")));
        coordinator.settle().await;

        let snapshot = coordinator.snapshot();
        let ids: Vec<i64> = snapshot.public_events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![30]);
        assert_eq!(snapshot.public_scope.as_ref().map(|o| o.as_str()), Some("3"));
        assert_eq!(snapshot.organization_id, "3");
        assert!(!snapshot.public_events_loading);
    }

    #[tokio::test]
    async fn test_swap_submission_succeeds_with_created_id() {
        let (mut coordinator, backend) = setup("");
        coordinator.submit_swap("5", "2,3").unwrap();
        assert!(coordinator.snapshot().swap_in_flight);
        wait_for_parked(&backend, 1).await;

        backend.release_swap(Ok(created(17)));
        coordinator.settle().await;

        let snapshot = coordinator.snapshot();
        assert_eq!(
            snapshot.swap_status,
            OperationStatus::Succeeded("Request #17 created.".to_owned())
        );
        assert!(!snapshot.swap_in_flight);
        assert_eq!(
            backend.calls(),
            vec![Call::CreateSwapRequest(SwapRequestCreate {
                assignment_id: 5,
                requested_user_ids: vec![2, 3],
            })]
        );
    }

    #[tokio::test]
    async fn test_submit_while_pending_sends_nothing() {
        let (mut coordinator, backend) = setup("");
        coordinator.submit_swap("5", "2,3").unwrap();
        assert_eq!(coordinator.submit_swap("5", "2,3"), Err(SwapInputError::Busy));
        wait_for_parked(&backend, 1).await;
        tokio::task::yield_now().await;

        assert_eq!(backend.calls().len(), 1);
        backend.release_swap(Ok(created(1)));
        coordinator.settle().await;
    }

    #[tokio::test]
    async fn test_snapshot_projects_next_event() {
        let (mut coordinator, backend) = setup("");
        coordinator.start();
        wait_for_parked(&backend, 1).await;
        backend.release_events(Ok(vec![
            event(1, "Hochamt", "2025-03-09T10:00:00"),
            event(2, "Abendmesse", "2025-03-08T19:00:00"),
        ]));
        coordinator.settle().await;

        let snapshot = coordinator.snapshot_at(datetime!(2025-03-08 12:00 UTC));
        assert_eq!(snapshot.next_event.map(|e| e.id), Some(2));
    }

    #[tokio::test]
    async fn test_run_publishes_snapshots_and_stops_on_shutdown() {
        let backend = Arc::new(ScriptedBackend::default());
        let coordinator = Coordinator::new(backend.clone(), "1");
        let (command_tx, command_rx) = command_channel();
        let (snapshot_tx, mut snapshot_rx) = snapshot_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(coordinator.run(command_rx, snapshot_tx, shutdown_rx));
        wait_for_parked(&backend, 2).await;
        backend.release_events(Ok(vec![event(1, "Hochamt", "2025-03-09T10:00:00")]));
        backend.release_public_events("1", Ok(vec![]));

        command_tx
            .send(DashboardCommand::SetOrganizationId("4".to_owned()))
            .await
            .unwrap();
        wait_for_parked(&backend, 1).await;
        backend.release_public_events("4", Ok(vec![event(40, "Rorate", "2025-12-06T06:30:00")]));

        snapshot_rx
            .wait_for(|s| s.public_scope.as_ref().map(|o| o.as_str()) == Some("4"))
            .await
            .unwrap();
        let snapshot = snapshot_rx.borrow().clone();
        assert_eq!(snapshot.events.len(), 1);
        assert_eq!(snapshot.public_events.len(), 1);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_ends_when_commands_close_and_work_settles() {
        let backend = Arc::new(ScriptedBackend::default());
        let coordinator = Coordinator::new(backend.clone(), "");
        let (command_tx, command_rx) = command_channel();
        let (snapshot_tx, snapshot_rx) = snapshot_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(coordinator.run(command_rx, snapshot_tx, shutdown_rx));
        command_tx
            .send(DashboardCommand::SubmitSwap {
                assignment_id: "5".to_owned(),
                user_ids: "2, 3,x,4".to_owned(),
            })
            .await
            .unwrap();
        drop(command_tx);

        wait_for_parked(&backend, 2).await;
        backend.release_events(Ok(vec![]));
        backend.release_swap(Err(BackendError::rejected("Assignment not found")));
        handle.await.unwrap();

        let snapshot = snapshot_rx.borrow().clone();
        assert_eq!(
            snapshot.swap_status,
            OperationStatus::Failed("Request could not be created.".to_owned())
        );
        assert!(backend.calls().contains(&Call::CreateSwapRequest(SwapRequestCreate {
            assignment_id: 5,
            requested_user_ids: vec![2, 3, 4],
        })));
    }
}
