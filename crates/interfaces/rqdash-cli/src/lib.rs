pub mod commands;
pub mod console;
pub mod settings;

use clap::ValueEnum;
use rqdash_core::{ActionKind, TargetKind};

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliTarget {
    Queue,
    Job,
    Worker,
}

impl From<CliTarget> for TargetKind {
    fn from(t: CliTarget) -> Self {
        match t {
            CliTarget::Queue => TargetKind::Queue,
            CliTarget::Job => TargetKind::Job,
            CliTarget::Worker => TargetKind::Worker,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliAction {
    Empty,
    Delete,
    #[value(name = "emptyall")]
    EmptyAll,
    #[value(name = "deleteall")]
    DeleteAll,
    Requeue,
    Cancel,
    #[value(name = "requeueall")]
    RequeueAll,
    #[value(name = "cancelall")]
    CancelAll,
    #[value(name = "suspendall")]
    SuspendAll,
    #[value(name = "resumeall")]
    ResumeAll,
}

impl From<CliAction> for ActionKind {
    fn from(a: CliAction) -> Self {
        match a {
            CliAction::Empty => ActionKind::Empty,
            CliAction::Delete => ActionKind::Delete,
            CliAction::EmptyAll => ActionKind::EmptyAll,
            CliAction::DeleteAll => ActionKind::DeleteAll,
            CliAction::Requeue => ActionKind::Requeue,
            CliAction::Cancel => ActionKind::Cancel,
            CliAction::RequeueAll => ActionKind::RequeueAll,
            CliAction::CancelAll => ActionKind::CancelAll,
            CliAction::SuspendAll => ActionKind::SuspendAll,
            CliAction::ResumeAll => ActionKind::ResumeAll,
        }
    }
}
