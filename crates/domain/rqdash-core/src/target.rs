use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RoutingError;

/// Resource family a command acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Queue,
    Job,
    Worker,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Queue, TargetKind::Job, TargetKind::Worker];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Queue => "queue",
            TargetKind::Job => "job",
            TargetKind::Worker => "worker",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RoutingError::UnknownTarget(s.to_string()))
    }
}

/// Every action name any target understands. Which pairs are valid is
/// decided by the registry, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Empty,
    Delete,
    EmptyAll,
    DeleteAll,
    Requeue,
    Cancel,
    RequeueAll,
    CancelAll,
    SuspendAll,
    ResumeAll,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::Empty,
        ActionKind::Delete,
        ActionKind::EmptyAll,
        ActionKind::DeleteAll,
        ActionKind::Requeue,
        ActionKind::Cancel,
        ActionKind::RequeueAll,
        ActionKind::CancelAll,
        ActionKind::SuspendAll,
        ActionKind::ResumeAll,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Empty => "empty",
            ActionKind::Delete => "delete",
            ActionKind::EmptyAll => "emptyall",
            ActionKind::DeleteAll => "deleteall",
            ActionKind::Requeue => "requeue",
            ActionKind::Cancel => "cancel",
            ActionKind::RequeueAll => "requeueall",
            ActionKind::CancelAll => "cancelall",
            ActionKind::SuspendAll => "suspendall",
            ActionKind::ResumeAll => "resumeall",
        }
    }

    /// "All" variants act on a selection or on every worker and carry no target id.
    pub fn is_bulk(self) -> bool {
        matches!(
            self,
            ActionKind::EmptyAll
                | ActionKind::DeleteAll
                | ActionKind::RequeueAll
                | ActionKind::CancelAll
                | ActionKind::SuspendAll
                | ActionKind::ResumeAll
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| RoutingError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back_to_the_same_kind() {
        for action in ActionKind::ALL {
            assert_eq!(action.as_str().parse::<ActionKind>().unwrap(), action);
        }
        assert_eq!("worker".parse::<TargetKind>().unwrap(), TargetKind::Worker);
    }

    #[test]
    fn unknown_names_are_routing_errors() {
        assert_eq!(
            "purge".parse::<ActionKind>(),
            Err(RoutingError::UnknownAction("purge".into()))
        );
        assert!("scheduler".parse::<TargetKind>().is_err());
    }
}
