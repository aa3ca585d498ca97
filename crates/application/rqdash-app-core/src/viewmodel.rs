use rqdash_core::ActionKind;

use crate::domain::{ModalOutcome, ModalPhase, ModalState};

/// Bootstrap-style tone for badges and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Secondary,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
            Tone::Secondary => "secondary",
        }
    }
}

pub fn worker_status_badge(status: &str) -> Tone {
    match status {
        "idle" => Tone::Warning,
        "busy" | "started" => Tone::Success,
        "suspended" => Tone::Danger,
        _ => Tone::Secondary,
    }
}

/// Row buttons offered for a job, by status.
pub fn job_row_actions(status: &str) -> &'static [ActionKind] {
    if status == "failed" {
        &[ActionKind::Requeue, ActionKind::Delete]
    } else {
        &[ActionKind::Cancel, ActionKind::Delete]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalVm {
    pub title: String,
    pub body: String,
    pub badge: Option<String>,
    pub detail: Option<String>,
    pub tone: Option<Tone>,
    pub show_footer: bool,
    pub busy: bool,
}

impl ModalVm {
    pub fn from_state(modal: &ModalState) -> Option<Self> {
        if !modal.is_open() {
            return None;
        }
        let (title, body) = modal
            .prompt
            .as_ref()
            .map(|p| (p.title.clone(), p.body.clone()))
            .unwrap_or_default();

        let mut vm = Self {
            title,
            body,
            badge: None,
            detail: None,
            tone: None,
            show_footer: modal.footer_visible(),
            busy: modal.phase == ModalPhase::Submitting,
        };

        match &modal.outcome {
            Some(ModalOutcome::Success { message }) => {
                vm.title = "Success".into();
                vm.body = message.clone();
                vm.tone = Some(Tone::Success);
            }
            Some(ModalOutcome::Failure {
                message,
                status_label,
                traceback,
            }) => {
                vm.title = "Error".into();
                vm.body = message.clone();
                vm.badge = status_label.clone();
                vm.detail = traceback.clone();
                vm.tone = Some(Tone::Danger);
            }
            None => {}
        }
        Some(vm)
    }
}
