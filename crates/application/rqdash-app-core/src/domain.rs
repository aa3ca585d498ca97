use rqdash_core::{ActionKind, CommandRequest, Prompt, RemoteError, TableKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::selection::SelectionStore;

pub type DialogId = uuid::Uuid;
pub type SubmissionId = uuid::Uuid;

/// Broker instance every request is addressed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerContext {
    pub instance_index: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalPhase {
    #[default]
    Idle,
    Configuring,
    AwaitingConfirmation,
    Submitting,
    ResolvedSuccess,
    ResolvedError,
}

impl ModalPhase {
    pub fn is_resolved(self) -> bool {
        matches!(self, ModalPhase::ResolvedSuccess | ModalPhase::ResolvedError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    Success {
        message: String,
    },
    Failure {
        message: String,
        status_label: Option<String>,
        traceback: Option<String>,
    },
}

impl From<&RemoteError> for ModalOutcome {
    fn from(e: &RemoteError) -> Self {
        ModalOutcome::Failure {
            message: e.message(),
            status_label: e.status_label(),
            traceback: e.traceback().map(str::to_string),
        }
    }
}

/// The single confirmation dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub dialog_id: Option<DialogId>,
    pub phase: ModalPhase,
    pub request: Option<CommandRequest>,
    pub prompt: Option<Prompt>,
    pub submission_id: Option<SubmissionId>,
    pub outcome: Option<ModalOutcome>,
}

impl ModalState {
    /// Confirm/cancel buttons are hidden once a request is in flight or resolved.
    pub fn footer_visible(&self) -> bool {
        matches!(
            self.phase,
            ModalPhase::Configuring | ModalPhase::AwaitingConfirmation
        )
    }

    pub fn is_open(&self) -> bool {
        self.phase != ModalPhase::Idle
    }
}

/// The two-state suspend/resume button on the workers dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleControl {
    pub action: ActionKind,
}

impl Default for ToggleControl {
    fn default() -> Self {
        Self {
            action: ActionKind::SuspendAll,
        }
    }
}

impl ToggleControl {
    pub fn label(&self) -> &'static str {
        match self.action {
            ActionKind::ResumeAll => "Resume All Workers",
            _ => "Suspend All Workers",
        }
    }

    /// Offers the opposite of the action that just went through.
    pub fn settle_after(&mut self, executed: ActionKind) {
        match executed {
            ActionKind::SuspendAll => self.action = ActionKind::ResumeAll,
            ActionKind::ResumeAll => self.action = ActionKind::SuspendAll,
            _ => {}
        }
    }
}

fn default_base_url() -> String {
    rqdash_config::DEFAULT_BASE_URL.to_string()
}

fn default_auto_dismiss_ms() -> u64 {
    rqdash_config::auto_dismiss_millis()
}

/// Operator settings persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub url_prefix: Option<String>,
    #[serde(default)]
    pub instance_index: usize,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Reload the designated table after a failed action as well.
    #[serde(default)]
    pub reload_on_error: bool,
    #[serde(default = "default_auto_dismiss_ms")]
    pub auto_dismiss_after_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            url_prefix: None,
            instance_index: 0,
            username: None,
            password: None,
            reload_on_error: false,
            auto_dismiss_after_ms: default_auto_dismiss_ms(),
        }
    }
}

impl AppSettings {
    pub fn auto_dismiss_after(&self) -> Duration {
        Duration::from_millis(self.auto_dismiss_after_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub context: BrokerContext,
    pub active_table: TableKind,
    pub selection: SelectionStore,
    pub modal: ModalState,
    pub suspend_toggle: ToggleControl,
    pub settings: AppSettings,
    pub sidebar_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            context: BrokerContext::default(),
            active_table: TableKind::Queues,
            selection: SelectionStore::default(),
            modal: ModalState::default(),
            suspend_toggle: ToggleControl::default(),
            settings: AppSettings::default(),
            sidebar_error: None,
        }
    }
}

impl AppState {
    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            context: BrokerContext {
                instance_index: settings.instance_index,
            },
            settings,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_follows_action() {
        let mut t = ToggleControl::default();
        assert_eq!(t.label(), "Suspend All Workers");
        t.settle_after(ActionKind::SuspendAll);
        assert_eq!(t.action, ActionKind::ResumeAll);
        assert_eq!(t.label(), "Resume All Workers");
        t.settle_after(ActionKind::ResumeAll);
        assert_eq!(t.action, ActionKind::SuspendAll);
    }

    #[test]
    fn toggle_tracks_the_executed_action_not_its_own_state() {
        let mut t = ToggleControl::default();
        t.settle_after(ActionKind::ResumeAll);
        assert_eq!(t.action, ActionKind::SuspendAll);

        t.settle_after(ActionKind::SuspendAll);
        t.settle_after(ActionKind::SuspendAll);
        assert_eq!(t.action, ActionKind::ResumeAll);

        t.settle_after(ActionKind::Delete);
        assert_eq!(t.action, ActionKind::ResumeAll);
    }

    #[test]
    fn settings_fill_missing_fields() {
        let s: AppSettings = serde_json::from_str(r#"{"instance_index": 2}"#).unwrap();
        assert_eq!(s.base_url, rqdash_config::DEFAULT_BASE_URL);
        assert_eq!(s.auto_dismiss_after(), rqdash_config::AUTO_DISMISS_AFTER);
        assert!(!s.reload_on_error);
        assert_eq!(AppState::with_settings(s).context.instance_index, 2);
    }
}
