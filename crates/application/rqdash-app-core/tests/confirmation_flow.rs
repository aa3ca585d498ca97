mod common;

use common::*;
use rqdash_app_core::app_core::AppCommand;
use rqdash_app_core::domain::{AppSettings, ModalOutcome, ModalPhase};
use rqdash_app_core::SelectionGroup;
use rqdash_core::{
    ActionKind, CommandRequest, EndpointKey, RemoteError, RoutingError, TableKind, TargetKind,
};
use std::time::Duration;

fn server_error() -> RemoteError {
    RemoteError::Http {
        status: 500,
        reason: "Internal Server Error".into(),
        message: "Unable to delete Queue high".into(),
        traceback: Some("Traceback (most recent call last):\n  ...".into()),
    }
}

#[tokio::test]
async fn deleting_a_queue_reloads_queues_and_sidebar_then_dismisses() {
    let broker = FakeBroker::default();
    let (mut kernel, store, view) = kernel_with(broker.clone(), fast_dismiss());

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Queue,
            ActionKind::Delete,
            "high",
        )))
        .unwrap();
    assert_eq!(phase(&store), ModalPhase::AwaitingConfirmation);
    let prompt = store.read(|s| s.modal.prompt.clone()).unwrap();
    assert_eq!(prompt.title, "Confirm to delete high");
    assert_eq!(prompt.body, "Queue will be deleted along with all jobs on it!");

    kernel.dispatch(AppCommand::Confirm).unwrap();
    assert_eq!(phase(&store), ModalPhase::Submitting);
    assert!(!store.read(|s| s.modal.footer_visible()));

    until_resolved(&mut kernel, &store).await;
    assert_eq!(phase(&store), ModalPhase::ResolvedSuccess);
    assert_eq!(
        store.read(|s| s.modal.outcome.clone()),
        Some(ModalOutcome::Success {
            message: "done: queues/delete".into()
        })
    );

    let calls = broker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, EndpointKey::DeleteQueue);
    assert_eq!(calls[0].1.values("queue_id"), ["high"]);
    assert_eq!(calls[0].1.values("redis_instance_index"), ["0"]);

    let reloads = view.reloads();
    assert_eq!(reloads.len(), 1);
    assert_eq!(reloads[0].0, TableKind::Queues);

    // Sidebar reload and auto-dismiss both land afterwards.
    pump_until(&mut kernel, &store, |s| {
        s.modal.phase == ModalPhase::Idle
            && s.selection.group(SelectionGroup::Queues).contains("high")
    })
    .await;
    assert_eq!(broker.queue_name_calls.lock().unwrap().len(), 1);
    assert_eq!(view.sidebars.lock().unwrap().len(), 1);
    assert_eq!(view.reloads().len(), 1);
}

#[tokio::test]
async fn bulk_requeue_sends_selection_in_render_order() {
    let broker = FakeBroker::default();
    let (mut kernel, store, view) = kernel_with(broker.clone(), fast_dismiss());
    kernel.preselect(SelectionGroup::Queues, &["high".into(), "low".into()]);
    kernel.preselect(SelectionGroup::JobStatuses, &["failed".into()]);

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::bulk(
            TargetKind::Job,
            ActionKind::RequeueAll,
        )))
        .unwrap();
    let prompt = store.read(|s| s.modal.prompt.clone()).unwrap();
    assert_eq!(
        prompt.title,
        "Confirm to requeue all failed jobs from high, low (statuses: failed)"
    );

    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;

    let calls = broker.calls();
    assert_eq!(calls[0].0, EndpointKey::RequeueFailedJobs);
    assert_eq!(calls[0].1.values("queues[]"), ["high", "low"]);
    assert_eq!(calls[0].1.values("jobstatus[]"), ["failed"]);
    assert_eq!(calls[0].1.values("redis_instance_index"), ["0"]);

    let reloads = view.reloads();
    assert_eq!(reloads.len(), 1);
    assert_eq!(reloads[0].0, TableKind::Jobs);
    assert!(broker.queue_name_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn suspending_workers_flips_the_toggle() {
    let broker = FakeBroker::default();
    let (mut kernel, store, view) = kernel_with(broker.clone(), fast_dismiss());
    assert_eq!(
        store.read(|s| s.suspend_toggle.label()),
        "Suspend All Workers"
    );

    let action = store.read(|s| s.suspend_toggle.action);
    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::bulk(
            TargetKind::Worker,
            action,
        )))
        .unwrap();
    assert_eq!(
        store.read(|s| s.modal.prompt.clone()).unwrap().title,
        "Confirm to suspend all workers"
    );
    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;

    assert_eq!(broker.calls()[0].0, EndpointKey::SuspendWorkers);
    assert_eq!(view.reloads()[0].0, TableKind::Workers);
    assert_eq!(
        store.read(|s| s.suspend_toggle.action),
        ActionKind::ResumeAll
    );
    assert_eq!(store.read(|s| s.suspend_toggle.label()), "Resume All Workers");
}

#[tokio::test]
async fn resuming_from_the_default_toggle_offers_suspend_next() {
    let broker = FakeBroker::default();
    let (mut kernel, store, _view) = kernel_with(broker.clone(), fast_dismiss());
    assert_eq!(
        store.read(|s| s.suspend_toggle.action),
        ActionKind::SuspendAll
    );

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::bulk(
            TargetKind::Worker,
            ActionKind::ResumeAll,
        )))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;

    assert_eq!(broker.calls()[0].0, EndpointKey::ResumeWorkers);
    assert_eq!(
        store.read(|s| s.suspend_toggle.action),
        ActionKind::SuspendAll
    );
    assert_eq!(store.read(|s| s.suspend_toggle.label()), "Suspend All Workers");
}

#[tokio::test]
async fn execute_refuses_while_a_submission_is_in_flight() {
    let broker = FakeBroker::default();
    let (mut kernel, store, view) = kernel_with(broker.clone(), fast_dismiss());

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Job,
            ActionKind::Delete,
            "a",
        )))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    assert_eq!(phase(&store), ModalPhase::Submitting);
    let first = store.read(|s| s.modal.submission_id);

    let second = kernel
        .execute(CommandRequest::single(
            TargetKind::Job,
            ActionKind::Delete,
            "b",
        ))
        .unwrap();
    assert_eq!(second, None);
    assert_eq!(store.read(|s| s.modal.submission_id), first);

    until_resolved(&mut kernel, &store).await;
    let calls = broker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.values("job_id"), ["a"]);
    assert_eq!(phase(&store), ModalPhase::ResolvedSuccess);
    assert_eq!(view.reloads().len(), 1);
}

#[tokio::test]
async fn failure_stays_open_without_reload() {
    let broker = FakeBroker::failing(server_error());
    let (mut kernel, store, view) = kernel_with(broker.clone(), fast_dismiss());

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Queue,
            ActionKind::Delete,
            "high",
        )))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;

    assert_eq!(phase(&store), ModalPhase::ResolvedError);
    assert_eq!(
        store.read(|s| s.modal.outcome.clone()),
        Some(ModalOutcome::Failure {
            message: "Unable to delete Queue high".into(),
            status_label: Some("500 Internal Server Error".into()),
            traceback: Some("Traceback (most recent call last):\n  ...".into()),
        })
    );
    assert!(!store.read(|s| s.modal.footer_visible()));

    tokio::time::sleep(Duration::from_millis(150)).await;
    kernel.tick();
    assert_eq!(phase(&store), ModalPhase::ResolvedError);
    assert!(view.reloads().is_empty());
    assert!(broker.queue_name_calls.lock().unwrap().is_empty());

    kernel.dispatch(AppCommand::CloseDialog).unwrap();
    assert_eq!(phase(&store), ModalPhase::Idle);
    assert!(store.read(|s| s.modal.request.is_none() && s.modal.outcome.is_none()));
}

#[tokio::test]
async fn reload_on_error_reloads_once() {
    let broker = FakeBroker::failing(server_error());
    let settings = AppSettings {
        reload_on_error: true,
        ..fast_dismiss()
    };
    let (mut kernel, store, view) = kernel_with(broker, settings);

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Job,
            ActionKind::Cancel,
            "j-1",
        )))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;

    assert_eq!(phase(&store), ModalPhase::ResolvedError);
    let reloads = view.reloads();
    assert_eq!(reloads.len(), 1);
    assert_eq!(reloads[0].0, TableKind::Jobs);
}

#[tokio::test]
async fn closing_without_confirm_sends_nothing() {
    let broker = FakeBroker::default();
    let (mut kernel, store, view) = kernel_with(broker.clone(), fast_dismiss());

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Worker,
            ActionKind::Delete,
            "w-1",
        )))
        .unwrap();
    kernel.dispatch(AppCommand::CloseDialog).unwrap();
    assert_eq!(phase(&store), ModalPhase::Idle);

    tokio::time::sleep(Duration::from_millis(20)).await;
    kernel.tick();
    assert!(broker.calls().is_empty());
    assert!(view.reloads().is_empty());
}

#[tokio::test]
async fn close_while_submitting_is_ignored() {
    let broker = FakeBroker::default();
    let (mut kernel, store, _view) = kernel_with(broker.clone(), fast_dismiss());

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Job,
            ActionKind::Delete,
            "j-9",
        )))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    kernel.dispatch(AppCommand::CloseDialog).unwrap();
    assert_eq!(phase(&store), ModalPhase::Submitting);

    until_resolved(&mut kernel, &store).await;
    assert_eq!(phase(&store), ModalPhase::ResolvedSuccess);
    assert_eq!(broker.calls().len(), 1);
}

#[tokio::test]
async fn confirm_outside_awaiting_confirmation_is_a_noop() {
    let broker = FakeBroker::default();
    let (mut kernel, store, _view) = kernel_with(broker.clone(), fast_dismiss());

    kernel.dispatch(AppCommand::Confirm).unwrap();
    assert_eq!(phase(&store), ModalPhase::Idle);

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Queue,
            ActionKind::Empty,
            "default",
        )))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;
    assert_eq!(broker.calls().len(), 1);
}

#[tokio::test]
async fn selection_change_after_open_needs_a_second_confirm() {
    let broker = FakeBroker::default();
    let (mut kernel, store, _view) = kernel_with(broker.clone(), fast_dismiss());
    kernel.preselect(SelectionGroup::Queues, &["a".into(), "b".into()]);

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::bulk(
            TargetKind::Job,
            ActionKind::DeleteAll,
        )))
        .unwrap();
    assert_eq!(
        store.read(|s| s.modal.prompt.clone()).unwrap().title,
        "Confirm to delete all jobs on a, b"
    );

    kernel
        .dispatch(AppCommand::ToggleQueue("b".into()))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();

    assert_eq!(phase(&store), ModalPhase::AwaitingConfirmation);
    assert_eq!(
        store.read(|s| s.modal.prompt.clone()).unwrap().title,
        "Confirm to delete all jobs on a"
    );
    assert!(broker.calls().is_empty());

    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;
    let calls = broker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.values("queues[]"), ["a"]);
    assert!(calls[0].1.values("jobstatus[]").is_empty());
}

#[tokio::test]
async fn empty_bulk_selection_is_sent_as_is() {
    let broker = FakeBroker::default();
    let (mut kernel, store, _view) = kernel_with(broker.clone(), fast_dismiss());

    kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::bulk(
            TargetKind::Job,
            ActionKind::CancelAll,
        )))
        .unwrap();
    kernel.dispatch(AppCommand::Confirm).unwrap();
    until_resolved(&mut kernel, &store).await;

    let calls = broker.calls();
    assert_eq!(calls[0].0, EndpointKey::CancelQueuedJobs);
    assert_eq!(
        calls[0].1.pairs(),
        [("redis_instance_index".to_string(), "0".to_string())]
    );
}

#[tokio::test]
async fn unroutable_requests_never_open() {
    let broker = FakeBroker::default();
    let (mut kernel, store, _view) = kernel_with(broker.clone(), fast_dismiss());

    let err = kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::single(
            TargetKind::Worker,
            ActionKind::Requeue,
            "w",
        )))
        .unwrap_err();
    assert_eq!(
        err,
        RoutingError::NoRoute {
            target: TargetKind::Worker,
            action: ActionKind::Requeue,
        }
    );
    assert_eq!(phase(&store), ModalPhase::Idle);

    let err = kernel
        .dispatch(AppCommand::OpenDialog(CommandRequest::bulk(
            TargetKind::Job,
            ActionKind::Requeue,
        )))
        .unwrap_err();
    assert!(matches!(err, RoutingError::MissingTargetId { .. }));

    let err = kernel
        .execute(CommandRequest::bulk(TargetKind::Queue, ActionKind::CancelAll))
        .unwrap_err();
    assert!(matches!(err, RoutingError::NoRoute { .. }));
    assert!(broker.calls().is_empty());
}
