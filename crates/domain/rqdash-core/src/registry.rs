//! Routing table for every mutating command.
//!
//! Adding an action means adding one `RouteEntry` to `ROUTES`; nothing else
//! branches on the (target, action) pair.

use crate::command::{CommandRequest, FormPayload};
use crate::error::RoutingError;
use crate::target::{ActionKind, TargetKind};
use crate::TableKind;

/// Verb a command is sent with. The monitor only takes mutations as POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Post => "POST",
        }
    }
}

/// Named monitor endpoints. The site map in the infra crate turns these into URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKey {
    ListQueues,
    ListWorkers,
    ListJobs,
    WorkerInfo,
    RedisMemory,
    EmptyQueue,
    DeleteQueue,
    EmptyAllQueues,
    DeleteAllQueues,
    RequeueJob,
    DeleteJob,
    CancelJob,
    RequeueFailedJobs,
    DeleteAllJobs,
    CancelQueuedJobs,
    DeleteWorkers,
    SuspendWorkers,
    ResumeWorkers,
}

impl EndpointKey {
    /// Path relative to the monitor's URL prefix.
    pub fn path(self) -> &'static str {
        match self {
            EndpointKey::ListQueues => "queues",
            EndpointKey::ListWorkers => "workers",
            EndpointKey::ListJobs => "jobs",
            EndpointKey::WorkerInfo => "workers/info",
            EndpointKey::RedisMemory => "redis/memory",
            EndpointKey::EmptyQueue => "queues/empty",
            EndpointKey::DeleteQueue => "queues/delete",
            EndpointKey::EmptyAllQueues => "queues/empty/all",
            EndpointKey::DeleteAllQueues => "queues/delete/all",
            EndpointKey::RequeueJob => "jobs/requeue",
            EndpointKey::DeleteJob => "jobs/delete",
            EndpointKey::CancelJob => "jobs/cancel",
            EndpointKey::RequeueFailedJobs => "jobs/requeue/all",
            EndpointKey::DeleteAllJobs => "jobs/delete/all",
            EndpointKey::CancelQueuedJobs => "jobs/cancel/all",
            EndpointKey::DeleteWorkers => "workers/delete",
            EndpointKey::SuspendWorkers => "workers/suspend",
            EndpointKey::ResumeWorkers => "workers/resume",
        }
    }
}

/// Where a payload field takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    TargetId,
    QueueSelection,
    JobStatusSelection,
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadField {
    pub name: &'static str,
    pub source: FieldSource,
}

/// Extra UI work after a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    ReloadSidebar,
    ToggleSuspendResume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub target: TargetKind,
    pub action: ActionKind,
    pub method: Method,
    pub endpoint: EndpointKey,
    pub payload: &'static [PayloadField],
    pub reload: TableKind,
    pub follow_up: Option<FollowUp>,
}

const QUEUE_ID: &[PayloadField] = &[PayloadField {
    name: "queue_id",
    source: FieldSource::TargetId,
}];

const JOB_ID: &[PayloadField] = &[PayloadField {
    name: "job_id",
    source: FieldSource::TargetId,
}];

const WORKER_ID: &[PayloadField] = &[PayloadField {
    name: "worker_id",
    source: FieldSource::TargetId,
}];

const JOB_SELECTION: &[PayloadField] = &[
    PayloadField {
        name: "queues",
        source: FieldSource::QueueSelection,
    },
    PayloadField {
        name: "jobstatus",
        source: FieldSource::JobStatusSelection,
    },
];

const DELETE_ALL_FLAG: &[PayloadField] = &[PayloadField {
    name: "delete_all",
    source: FieldSource::Literal("true"),
}];

const NO_FIELDS: &[PayloadField] = &[];

const fn post(
    target: TargetKind,
    action: ActionKind,
    endpoint: EndpointKey,
    payload: &'static [PayloadField],
    reload: TableKind,
    follow_up: Option<FollowUp>,
) -> RouteEntry {
    RouteEntry {
        target,
        action,
        method: Method::Post,
        endpoint,
        payload,
        reload,
        follow_up,
    }
}

pub static ROUTES: &[RouteEntry] = &[
    // Queues
    post(
        TargetKind::Queue,
        ActionKind::Empty,
        EndpointKey::EmptyQueue,
        QUEUE_ID,
        TableKind::Queues,
        None,
    ),
    post(
        TargetKind::Queue,
        ActionKind::Delete,
        EndpointKey::DeleteQueue,
        QUEUE_ID,
        TableKind::Queues,
        Some(FollowUp::ReloadSidebar),
    ),
    post(
        TargetKind::Queue,
        ActionKind::EmptyAll,
        EndpointKey::EmptyAllQueues,
        NO_FIELDS,
        TableKind::Queues,
        None,
    ),
    post(
        TargetKind::Queue,
        ActionKind::DeleteAll,
        EndpointKey::DeleteAllQueues,
        NO_FIELDS,
        TableKind::Queues,
        Some(FollowUp::ReloadSidebar),
    ),
    // Jobs
    post(
        TargetKind::Job,
        ActionKind::Requeue,
        EndpointKey::RequeueJob,
        JOB_ID,
        TableKind::Jobs,
        None,
    ),
    post(
        TargetKind::Job,
        ActionKind::Delete,
        EndpointKey::DeleteJob,
        JOB_ID,
        TableKind::Jobs,
        None,
    ),
    post(
        TargetKind::Job,
        ActionKind::Cancel,
        EndpointKey::CancelJob,
        JOB_ID,
        TableKind::Jobs,
        None,
    ),
    post(
        TargetKind::Job,
        ActionKind::RequeueAll,
        EndpointKey::RequeueFailedJobs,
        JOB_SELECTION,
        TableKind::Jobs,
        None,
    ),
    post(
        TargetKind::Job,
        ActionKind::DeleteAll,
        EndpointKey::DeleteAllJobs,
        JOB_SELECTION,
        TableKind::Jobs,
        None,
    ),
    post(
        TargetKind::Job,
        ActionKind::CancelAll,
        EndpointKey::CancelQueuedJobs,
        JOB_SELECTION,
        TableKind::Jobs,
        None,
    ),
    // Workers
    post(
        TargetKind::Worker,
        ActionKind::Delete,
        EndpointKey::DeleteWorkers,
        WORKER_ID,
        TableKind::Workers,
        None,
    ),
    post(
        TargetKind::Worker,
        ActionKind::DeleteAll,
        EndpointKey::DeleteWorkers,
        DELETE_ALL_FLAG,
        TableKind::Workers,
        None,
    ),
    post(
        TargetKind::Worker,
        ActionKind::SuspendAll,
        EndpointKey::SuspendWorkers,
        NO_FIELDS,
        TableKind::Workers,
        Some(FollowUp::ToggleSuspendResume),
    ),
    post(
        TargetKind::Worker,
        ActionKind::ResumeAll,
        EndpointKey::ResumeWorkers,
        NO_FIELDS,
        TableKind::Workers,
        Some(FollowUp::ToggleSuspendResume),
    ),
];

pub fn lookup(target: TargetKind, action: ActionKind) -> Option<&'static RouteEntry> {
    ROUTES
        .iter()
        .find(|r| r.target == target && r.action == action)
}

/// Finds the route for `request` and checks it carries what the route needs.
pub fn route(request: &CommandRequest) -> Result<&'static RouteEntry, RoutingError> {
    let entry = lookup(request.target, request.action).ok_or(RoutingError::NoRoute {
        target: request.target,
        action: request.action,
    })?;

    if entry.reads_target_id() && request.target_id.as_deref().map_or(true, str::is_empty) {
        return Err(RoutingError::MissingTargetId {
            target: request.target,
            action: request.action,
        });
    }

    Ok(entry)
}

impl RouteEntry {
    pub fn reads_target_id(&self) -> bool {
        self.payload
            .iter()
            .any(|f| f.source == FieldSource::TargetId)
    }

    pub fn reads_selection(&self) -> bool {
        self.payload.iter().any(|f| {
            matches!(
                f.source,
                FieldSource::QueueSelection | FieldSource::JobStatusSelection
            )
        })
    }

    /// Builds the form body for `request`. The broker instance index is added
    /// by the caller, which owns the context.
    pub fn resolve_payload(&self, request: &CommandRequest) -> Result<FormPayload, RoutingError> {
        let mut payload = FormPayload::new();
        for field in self.payload {
            match field.source {
                FieldSource::TargetId => {
                    let id = request.target_id.as_deref().filter(|id| !id.is_empty()).ok_or(
                        RoutingError::MissingTargetId {
                            target: self.target,
                            action: self.action,
                        },
                    )?;
                    payload.push(field.name, id);
                }
                FieldSource::QueueSelection => {
                    let queues = request
                        .selection
                        .as_ref()
                        .map(|s| s.queues.as_slice())
                        .unwrap_or_default();
                    payload.push_list(field.name, queues);
                }
                FieldSource::JobStatusSelection => {
                    let statuses = request
                        .selection
                        .as_ref()
                        .map(|s| s.job_statuses.as_slice())
                        .unwrap_or_default();
                    payload.push_list(field.name, statuses);
                }
                FieldSource::Literal(value) => payload.push(field.name, value),
            }
        }
        Ok(payload)
    }
}
