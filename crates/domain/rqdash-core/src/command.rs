use serde::{Deserialize, Serialize};

use crate::target::{ActionKind, TargetKind};
use crate::INSTANCE_INDEX_FIELD;

/// Checked queues and job statuses at the moment they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub queues: Vec<String>,
    pub job_statuses: Vec<String>,
}

impl SelectionSnapshot {
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty() && self.job_statuses.is_empty()
    }
}

/// One operator command, built where the gesture happened and consumed once
/// by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub target: TargetKind,
    pub action: ActionKind,
    pub target_id: Option<String>,
    /// Origin queue of a job; only the requeue prompt reads it.
    pub origin_queue: Option<String>,
    pub selection: Option<SelectionSnapshot>,
}

impl CommandRequest {
    pub fn single(target: TargetKind, action: ActionKind, target_id: impl Into<String>) -> Self {
        Self {
            target,
            action,
            target_id: Some(target_id.into()),
            origin_queue: None,
            selection: None,
        }
    }

    pub fn bulk(target: TargetKind, action: ActionKind) -> Self {
        Self {
            target,
            action,
            target_id: None,
            origin_queue: None,
            selection: None,
        }
    }

    pub fn with_origin_queue(mut self, queue: impl Into<String>) -> Self {
        self.origin_queue = Some(queue.into());
        self
    }

    pub fn with_selection(mut self, selection: SelectionSnapshot) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn is_bulk(&self) -> bool {
        self.action.is_bulk()
    }
}

/// Ordered form fields for one request. List values repeat their key with a
/// `[]` suffix, which is how the monitor server reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload(Vec<(String, String)>);

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.0.push((name.to_string(), value.into()));
    }

    pub fn push_list(&mut self, name: &str, values: &[String]) {
        let key = format!("{name}[]");
        for v in values {
            self.0.push((key.clone(), v.clone()));
        }
    }

    pub fn with_instance_index(mut self, index: usize) -> Self {
        self.0.retain(|(k, _)| k.as_str() != INSTANCE_INDEX_FIELD);
        self.push(INSTANCE_INDEX_FIELD, index.to_string());
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// All values sent under `key`, in order.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

/// Success body of every mutating endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReply {
    pub message: String,
}
