use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use rqdash_core::registry::{self, FollowUp};
use rqdash_core::{compose, CommandRequest, RemoteError, RoutingError, TableKind, TargetKind};

use crate::app_core::{AppCommand, AppStore, DomainEvent};
use crate::async_runtime;
use crate::domain::{DialogId, ModalPhase, SubmissionId};
use crate::ports::{BrokerApi, DashboardView, TableQuery};
use crate::selection::SelectionGroup;

/// Owns the confirmation dialog and the dispatcher.
///
/// `dispatch` runs a gesture to completion on the caller's thread. Remote work
/// runs on tokio tasks that report back through the event channel; `tick` (or
/// `next_event`) folds those reports into the store on the owner's loop.
pub struct AppKernel<A, V> {
    pub store: AppStore,
    api: Arc<A>,
    view: Arc<V>,

    tx: mpsc::Sender<DomainEvent>,
    rx: mpsc::Receiver<DomainEvent>,
    dismiss: Option<CancellationToken>,
}

impl<A, V> AppKernel<A, V>
where
    A: BrokerApi,
    V: DashboardView,
{
    pub fn new(store: AppStore, api: A, view: V) -> Self {
        let (tx, rx) = mpsc::channel(rqdash_config::EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            api: Arc::new(api),
            view: Arc::new(view),
            tx,
            rx,
            dismiss: None,
        }
    }

    pub fn dispatch(&mut self, cmd: AppCommand) -> Result<(), RoutingError> {
        match cmd {
            AppCommand::OpenDialog(request) => return self.open_dialog(request),

            AppCommand::Confirm => return self.confirm(),

            AppCommand::CloseDialog => {
                if self.store.read(|s| s.modal.phase) == ModalPhase::Submitting {
                    debug!("close ignored while a request is in flight");
                } else {
                    self.cancel_dismiss();
                    self.store.apply(DomainEvent::DialogClosed);
                }
            }

            AppCommand::ToggleQueue(label) => self.toggle(SelectionGroup::Queues, label),
            AppCommand::ToggleJobStatus(label) => self.toggle(SelectionGroup::JobStatuses, label),

            AppCommand::ReloadSidebar => self.reload_sidebar(),

            AppCommand::SelectInstance(index) => {
                info!(instance = index, "switching broker instance");
                self.store.apply(DomainEvent::InstanceSelected(index));
                let table = self.store.read(|s| s.active_table);
                let query = self.table_query();
                let context = query.context;
                self.view.reload_table(table, query);
                self.view.refresh_memory(context);
                self.reload_sidebar();
            }

            AppCommand::ShowTable(table) => {
                self.store.apply(DomainEvent::TableActivated(table));
                self.view.reload_table(table, self.table_query());
            }
        }
        Ok(())
    }

    fn open_dialog(&mut self, mut request: CommandRequest) -> Result<(), RoutingError> {
        if self.store.read(|s| s.modal.phase) == ModalPhase::Submitting {
            warn!(
                target = %request.target,
                action = %request.action,
                "dialog busy with a submission; open ignored"
            );
            return Ok(());
        }
        self.cancel_dismiss();

        if request.is_bulk() && request.selection.is_none() {
            request.selection = Some(self.store.read(|s| s.selection.snapshot()));
        }

        let dialog_id: DialogId = uuid::Uuid::new_v4();
        self.store.apply(DomainEvent::DialogConfigured {
            dialog_id,
            request: request.clone(),
        });

        match compose(&request) {
            Ok(prompt) => {
                debug!(%dialog_id, title = %prompt.title, "awaiting confirmation");
                self.store.apply(DomainEvent::PromptComposed(prompt));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "cannot open confirmation dialog");
                self.store.apply(DomainEvent::DialogClosed);
                Err(e)
            }
        }
    }

    fn confirm(&mut self) -> Result<(), RoutingError> {
        let modal = self.store.read(|s| s.modal.clone());
        if modal.phase != ModalPhase::AwaitingConfirmation {
            debug!(phase = ?modal.phase, "confirm ignored");
            return Ok(());
        }
        let Some(request) = modal.request else {
            return Ok(());
        };

        if selection_sensitive(&request) {
            let current = self.store.read(|s| s.selection.snapshot());
            if request.selection.as_ref() != Some(&current) {
                let request = request.with_selection(current);
                let prompt = compose(&request)?;
                info!(title = %prompt.title, "selection changed since the dialog opened; confirm again");
                self.store
                    .apply(DomainEvent::PromptRecomposed { request, prompt });
                return Ok(());
            }
        }

        self.execute(request).map(|_| ())
    }

    /// Routes `request`, sends it, and returns the id its completion event will
    /// carry. Returns `None` without sending while another submission is in flight.
    pub fn execute(
        &mut self,
        request: CommandRequest,
    ) -> Result<Option<SubmissionId>, RoutingError> {
        if self.store.read(|s| s.modal.phase) == ModalPhase::Submitting {
            warn!(
                target = %request.target,
                action = %request.action,
                "a submission is already in flight; request not sent"
            );
            return Ok(None);
        }
        let route = registry::route(&request).inspect_err(|e| {
            error!(error = %e, "routing failed");
        })?;
        let context = self.store.read(|s| s.context);
        let payload = route
            .resolve_payload(&request)?
            .with_instance_index(context.instance_index);

        if route.reads_selection() {
            let empty = request
                .selection
                .as_ref()
                .map_or(true, |s| s.queues.is_empty() || s.job_statuses.is_empty());
            if empty {
                warn!(
                    action = %request.action,
                    "bulk action sent with an empty queue or status selection"
                );
            }
        }

        self.cancel_dismiss();
        let submission_id: SubmissionId = uuid::Uuid::new_v4();
        info!(
            target = %request.target,
            action = %request.action,
            endpoint = route.endpoint.path(),
            instance = context.instance_index,
            %submission_id,
            "dispatching action"
        );
        self.store.apply(DomainEvent::SubmissionStarted {
            submission_id,
            request,
        });

        let api = self.api.clone();
        let tx = self.tx.clone();
        let spawned = async_runtime::spawn(async move {
            let ev = match api.submit_action(route, payload).await {
                Ok(reply) => DomainEvent::ActionSucceeded {
                    submission_id,
                    message: reply.message,
                },
                Err(error) => DomainEvent::ActionFailed {
                    submission_id,
                    error,
                },
            };
            let _ = tx.send(ev).await;
        });

        if let Err(e) = spawned {
            self.process(DomainEvent::ActionFailed {
                submission_id,
                error: RemoteError::Transport(format!("failed to start request: {e}")),
            });
        }
        Ok(Some(submission_id))
    }

    pub fn tick(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            self.process(ev);
        }
    }

    /// Waits for one event and folds it in.
    pub async fn next_event(&mut self) {
        if let Some(ev) = self.rx.recv().await {
            self.process(ev);
        }
    }

    pub fn sender(&self) -> mpsc::Sender<DomainEvent> {
        self.tx.clone()
    }

    /// Checks exactly `labels` in `group` without reloading anything.
    pub fn preselect(&self, group: SelectionGroup, labels: &[String]) {
        self.store
            .with_state_mut(|state| state.selection.group_mut(group).select_exactly(labels));
    }

    fn process(&mut self, ev: DomainEvent) {
        match ev {
            DomainEvent::ActionSucceeded {
                submission_id,
                message,
            } => {
                if !self.is_current(submission_id) {
                    warn!(%submission_id, "dropping completion of a stale submission");
                    return;
                }
                info!(%submission_id, %message, "action succeeded");
                self.store.apply(DomainEvent::ActionSucceeded {
                    submission_id,
                    message,
                });
                self.after_success();
            }

            DomainEvent::ActionFailed {
                submission_id,
                error,
            } => {
                if !self.is_current(submission_id) {
                    warn!(%submission_id, "dropping completion of a stale submission");
                    return;
                }
                warn!(%submission_id, %error, "action failed");
                self.store.apply(DomainEvent::ActionFailed {
                    submission_id,
                    error,
                });
                if self.store.read(|s| s.settings.reload_on_error) {
                    self.reload_designated_table();
                }
            }

            DomainEvent::AutoDismissElapsed { dialog_id } => {
                self.store
                    .apply(DomainEvent::AutoDismissElapsed { dialog_id });
                if !self.store.read(|s| s.modal.is_open()) {
                    self.dismiss = None;
                }
            }

            DomainEvent::QueueListReloaded(names) => {
                self.store
                    .apply(DomainEvent::QueueListReloaded(names.clone()));
                self.view.sidebar_reloaded(&names);
            }

            DomainEvent::SidebarReloadFailed(error) => {
                warn!(%error, "sidebar reload failed");
                self.view.sidebar_failed(&error);
                self.store.apply(DomainEvent::SidebarReloadFailed(error));
            }

            other => self.store.apply(other),
        }
    }

    fn is_current(&self, submission_id: SubmissionId) -> bool {
        self.store.read(|s| {
            s.modal.phase == ModalPhase::Submitting && s.modal.submission_id == Some(submission_id)
        })
    }

    fn after_success(&mut self) {
        let Some(route) = self.reload_designated_table() else {
            return;
        };

        match route.follow_up {
            Some(FollowUp::ReloadSidebar) => self.reload_sidebar(),
            Some(FollowUp::ToggleSuspendResume) => {
                self.store
                    .apply(DomainEvent::SuspendToggleSettled(route.action));
            }
            None => {}
        }

        if let Some(dialog_id) = self.store.read(|s| s.modal.dialog_id) {
            self.schedule_dismiss(dialog_id);
        }
    }

    fn reload_designated_table(&self) -> Option<&'static registry::RouteEntry> {
        let request = self.store.read(|s| s.modal.request.clone())?;
        let route = registry::lookup(request.target, request.action)?;
        self.view.reload_table(route.reload, self.table_query());
        Some(route)
    }

    fn toggle(&mut self, group: SelectionGroup, label: String) {
        if !self.store.read(|s| s.selection.group(group).contains(&label)) {
            debug!(?group, %label, "toggle for unknown checkbox ignored");
            return;
        }
        self.store
            .apply(DomainEvent::SelectionToggled { group, label });
        if self.store.read(|s| s.active_table) == TableKind::Jobs {
            self.view.reload_table(TableKind::Jobs, self.table_query());
        }
    }

    fn table_query(&self) -> TableQuery {
        self.store.read(|s| TableQuery {
            context: s.context,
            selection: s.selection.snapshot(),
        })
    }

    fn reload_sidebar(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let context = self.store.read(|s| s.context);
        let spawned = async_runtime::spawn(async move {
            let ev = match api.queue_names(context).await {
                Ok(names) => DomainEvent::QueueListReloaded(names),
                Err(e) => DomainEvent::SidebarReloadFailed(e),
            };
            let _ = tx.send(ev).await;
        });
        if let Err(e) = spawned {
            error!(error = %e, "could not start sidebar reload");
        }
    }

    fn schedule_dismiss(&mut self, dialog_id: DialogId) {
        self.cancel_dismiss();
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let after = self.store.read(|s| s.settings.auto_dismiss_after());
        let tx = self.tx.clone();

        let spawned = async_runtime::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    let _ = tx.send(DomainEvent::AutoDismissElapsed { dialog_id }).await;
                }
            }
        });

        match spawned {
            Ok(_) => self.dismiss = Some(token),
            Err(e) => error!(error = %e, "could not schedule auto-dismiss"),
        }
    }

    fn cancel_dismiss(&mut self) {
        if let Some(token) = self.dismiss.take() {
            token.cancel();
        }
    }
}

/// Bulk queue and job prompts name the selection, so a change after opening
/// needs a fresh confirmation. Worker bulk actions ignore it.
fn selection_sensitive(request: &CommandRequest) -> bool {
    request.is_bulk() && request.target != TargetKind::Worker
}
