use rqdash_core::{ActionKind, CommandRequest, Prompt, RemoteError, TableKind};

use crate::domain::{DialogId, SubmissionId};
use crate::selection::SelectionGroup;

#[derive(Debug, Clone)]
pub enum DomainEvent {
    // Dialog lifecycle
    DialogConfigured {
        dialog_id: DialogId,
        request: CommandRequest,
    },
    PromptComposed(Prompt),
    PromptRecomposed {
        request: CommandRequest,
        prompt: Prompt,
    },
    DialogClosed,
    AutoDismissElapsed {
        dialog_id: DialogId,
    },

    // Submission
    SubmissionStarted {
        submission_id: SubmissionId,
        request: CommandRequest,
    },
    ActionSucceeded {
        submission_id: SubmissionId,
        message: String,
    },
    ActionFailed {
        submission_id: SubmissionId,
        error: RemoteError,
    },

    // Sidebar
    SelectionToggled {
        group: SelectionGroup,
        label: String,
    },
    QueueListReloaded(Vec<String>),
    SidebarReloadFailed(RemoteError),

    // Dashboard
    InstanceSelected(usize),
    TableActivated(TableKind),
    /// Carries the suspend/resume action that succeeded.
    SuspendToggleSettled(ActionKind),
}
