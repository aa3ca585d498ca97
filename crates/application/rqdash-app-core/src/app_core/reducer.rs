use crate::domain::{AppState, ModalOutcome, ModalPhase, ModalState};
use crate::selection::SelectionGroup;

use super::events::DomainEvent;

pub fn reduce(mut state: AppState, ev: DomainEvent) -> AppState {
    match ev {
        DomainEvent::DialogConfigured { dialog_id, request } => {
            state.modal = ModalState {
                dialog_id: Some(dialog_id),
                phase: ModalPhase::Configuring,
                request: Some(request),
                ..ModalState::default()
            };
        }

        DomainEvent::PromptComposed(prompt) => {
            if state.modal.phase == ModalPhase::Configuring {
                state.modal.prompt = Some(prompt);
                state.modal.phase = ModalPhase::AwaitingConfirmation;
            }
        }

        DomainEvent::PromptRecomposed { request, prompt } => {
            if state.modal.phase == ModalPhase::AwaitingConfirmation {
                state.modal.request = Some(request);
                state.modal.prompt = Some(prompt);
            }
        }

        DomainEvent::DialogClosed => {
            if state.modal.phase != ModalPhase::Submitting {
                state.modal = ModalState::default();
            }
        }

        DomainEvent::AutoDismissElapsed { dialog_id } => {
            if state.modal.dialog_id == Some(dialog_id)
                && state.modal.phase == ModalPhase::ResolvedSuccess
            {
                state.modal = ModalState::default();
            }
        }

        DomainEvent::SubmissionStarted {
            submission_id,
            request,
        } => {
            if state.modal.dialog_id.is_none() {
                state.modal.dialog_id = Some(uuid::Uuid::new_v4());
            }
            state.modal.request = Some(request);
            state.modal.submission_id = Some(submission_id);
            state.modal.outcome = None;
            state.modal.phase = ModalPhase::Submitting;
        }

        DomainEvent::ActionSucceeded {
            submission_id,
            message,
        } => {
            if is_current_submission(&state.modal, submission_id) {
                state.modal.outcome = Some(ModalOutcome::Success { message });
                state.modal.phase = ModalPhase::ResolvedSuccess;
            }
        }

        DomainEvent::ActionFailed {
            submission_id,
            error,
        } => {
            if is_current_submission(&state.modal, submission_id) {
                state.modal.outcome = Some(ModalOutcome::from(&error));
                state.modal.phase = ModalPhase::ResolvedError;
            }
        }

        DomainEvent::SelectionToggled { group, label } => {
            state.selection.toggle(group, &label);
        }

        DomainEvent::QueueListReloaded(names) => {
            state
                .selection
                .group_mut(SelectionGroup::Queues)
                .replace_items(names);
            state.sidebar_error = None;
        }

        DomainEvent::SidebarReloadFailed(error) => {
            state.sidebar_error = Some(error.to_string());
        }

        DomainEvent::InstanceSelected(index) => {
            state.context.instance_index = index;
            state.settings.instance_index = index;
        }

        DomainEvent::TableActivated(table) => state.active_table = table,

        DomainEvent::SuspendToggleSettled(action) => state.suspend_toggle.settle_after(action),
    }
    state
}

fn is_current_submission(modal: &ModalState, id: crate::domain::SubmissionId) -> bool {
    modal.phase == ModalPhase::Submitting && modal.submission_id == Some(id)
}
