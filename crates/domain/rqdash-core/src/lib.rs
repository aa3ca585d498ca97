use serde::{Deserialize, Serialize};

pub mod command;
pub mod error;
pub mod prompt;
pub mod registry;
pub mod target;

pub use command::{ActionReply, CommandRequest, FormPayload, SelectionSnapshot};
pub use error::{RemoteError, RoutingError};
pub use prompt::{compose, Prompt};
pub use registry::{EndpointKey, FollowUp, Method, RouteEntry};
pub use target::{ActionKind, TargetKind};

/// Form field carrying the selected broker instance on every request.
pub const INSTANCE_INDEX_FIELD: &str = "redis_instance_index";

/// Dashboard tables that can be reloaded after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Queues,
    Jobs,
    Workers,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Queues => "queues",
            TableKind::Jobs => "jobs",
            TableKind::Workers => "workers",
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
