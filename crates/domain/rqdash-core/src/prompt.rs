use serde::{Deserialize, Serialize};

use crate::command::CommandRequest;
use crate::error::RoutingError;
use crate::registry;
use crate::target::{ActionKind, TargetKind};

/// Title and body shown in the confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub title: String,
    pub body: String,
}

impl Prompt {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Composes the confirmation prompt for `request`.
///
/// Fails with the same errors as routing, so a dialog never opens for a
/// command that could not be sent.
pub fn compose(request: &CommandRequest) -> Result<Prompt, RoutingError> {
    registry::route(request)?;

    let id = request.target_id.as_deref().unwrap_or_default();
    let (queues, statuses) = match &request.selection {
        Some(s) => (s.queues.join(", "), s.job_statuses.join(", ")),
        None => (String::new(), String::new()),
    };

    let prompt = match (request.target, request.action) {
        (TargetKind::Queue, ActionKind::Empty) => Prompt::new(
            format!("Confirm to empty {id}"),
            "All valid jobs currently on queue will be removed from queue as well as from redis job namespace!",
        ),
        (TargetKind::Queue, ActionKind::Delete) => Prompt::new(
            format!("Confirm to delete {id}"),
            "Queue will be deleted along with all jobs on it!",
        ),
        (TargetKind::Queue, ActionKind::DeleteAll) => Prompt::new(
            format!("Confirm to delete these queues {queues}"),
            "These queues will be deleted along with all jobs on it!",
        ),
        (TargetKind::Queue, ActionKind::EmptyAll) => Prompt::new(
            format!("Confirm to empty these queues {queues}"),
            "All the queued jobs will be removed from these queues!",
        ),
        (TargetKind::Job, ActionKind::Requeue) => Prompt::new(
            format!("Confirm to requeue {id}"),
            format!(
                "Job will be removed from failed job registry and put on {}",
                request.origin_queue.as_deref().unwrap_or_default()
            ),
        ),
        (TargetKind::Job, ActionKind::Delete) => Prompt::new(
            format!("Confirm to delete {id}"),
            "Job will be permanently deleted from Redis!",
        ),
        (TargetKind::Job, ActionKind::Cancel) => Prompt::new(
            format!("Confirm to cancel {id}"),
            "Job will be cancelled and never be executed or inspected!",
        ),
        (TargetKind::Job, ActionKind::CancelAll) => Prompt::new(
            format!("Confirm to cancel all jobs on {queues}"),
            "Jobs will be cancelled and never be executed or inspected!",
        ),
        (TargetKind::Job, ActionKind::DeleteAll) => Prompt::new(
            format!("Confirm to delete all jobs on {queues}"),
            "Jobs will be permanently deleted from Redis!",
        ),
        (TargetKind::Job, ActionKind::RequeueAll) => Prompt::new(
            format!("Confirm to requeue all failed jobs from {queues}"),
            "All failed jobs will be removed from their queue failed job registry and put on their respective original queues again",
        ),
        (TargetKind::Worker, ActionKind::Delete) => Prompt::new(
            format!("Confirm to delete {id}"),
            "Worker on same instance will be sent SIGINT to request warm shutdown, any currently executing tasks will be completed first.",
        ),
        (TargetKind::Worker, ActionKind::DeleteAll) => Prompt::new(
            "Confirm to delete all workers",
            "All workers on same instance will be sent SIGINT to request warm shutdown, any currently executing tasks will be completed first.",
        ),
        (TargetKind::Worker, ActionKind::SuspendAll) => Prompt::new(
            "Confirm to suspend all workers",
            "All workers will be suspended, no jobs will be executed now, any currently executing tasks will be completed first. Resume workers to make them work again.",
        ),
        (TargetKind::Worker, ActionKind::ResumeAll) => Prompt::new(
            "Confirm to resume all workers",
            "All workers will be resumed and will start to work again.",
        ),
        (target, action) => return Err(RoutingError::NoRoute { target, action }),
    };

    let mut prompt = Prompt {
        title: prompt.title.trim_end().to_string(),
        body: prompt.body,
    };
    if request.target == TargetKind::Job && request.is_bulk() && !statuses.is_empty() {
        prompt.title = format!("{} (statuses: {statuses})", prompt.title);
    }
    Ok(prompt)
}
