use crate::console::{
    render_failure, render_jobs, render_queues, render_worker_detail, render_workers, ConsoleView,
};
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rqdash_app_core::domain::{AppSettings, AppState, ModalOutcome};
use rqdash_app_core::{AppCommand, AppKernel, AppStore, SelectionGroup};
use rqdash_core::registry::{self, FollowUp};
use rqdash_core::{CommandRequest, Prompt, RemoteError, SelectionSnapshot, TargetKind};
use rqdash_infra::{
    default_http_client, BasicAuth, JobRow, MemoryUsage, MonitorClient, QueueRow, SiteMap,
    WorkerDetail, WorkerRow,
};
use std::time::Duration;
use tracing::{debug, info};

pub fn connect(settings: &AppSettings) -> Result<MonitorClient> {
    let site = SiteMap::new(&settings.base_url, settings.url_prefix.as_deref())
        .with_context(|| format!("Invalid monitor address {}", settings.base_url))?;
    let client = default_http_client().context("Failed to build HTTP client")?;
    let auth = settings.username.as_ref().map(|username| BasicAuth {
        username: username.clone(),
        password: settings.password.clone(),
    });
    debug!(base = %site.base(), auth = auth.is_some(), "monitor client ready");
    Ok(MonitorClient::new(client, site).with_basic_auth(auth))
}

fn read_failed(what: &str, err: RemoteError) -> anyhow::Error {
    for line in render_failure(what, &err) {
        eprintln!("{line}");
    }
    anyhow::Error::new(err).context(format!("Failed to load {what}"))
}

pub async fn cmd_queues(settings: &AppSettings) -> Result<Vec<QueueRow>> {
    let client = connect(settings)?;
    let rows = client
        .list_queues(settings.instance_index)
        .await
        .map_err(|e| read_failed("queues", e))?;
    render_queues(&rows).iter().for_each(|l| println!("{l}"));
    Ok(rows)
}

pub async fn cmd_workers(settings: &AppSettings) -> Result<Vec<WorkerRow>> {
    let client = connect(settings)?;
    let rows = client
        .list_workers(settings.instance_index)
        .await
        .map_err(|e| read_failed("workers", e))?;
    render_workers(&rows).iter().for_each(|l| println!("{l}"));
    Ok(rows)
}

/// Lists jobs for the given queues and statuses. No queues means every queue
/// the monitor knows; no statuses means every status.
pub async fn cmd_jobs(
    settings: &AppSettings,
    queues: Vec<String>,
    statuses: Vec<String>,
) -> Result<Vec<JobRow>> {
    let client = connect(settings)?;
    let selection = SelectionSnapshot {
        queues: queues_or_all(&client, settings.instance_index, queues).await?,
        job_statuses: statuses_or_all(statuses),
    };
    println!(
        ":: jobs in [{}] with status [{}]",
        selection.queues.join(", "),
        selection.job_statuses.join(", ")
    );
    let rows = client
        .list_jobs(settings.instance_index, &selection)
        .await
        .map_err(|e| read_failed("jobs", e))?;
    render_jobs(&rows).iter().for_each(|l| println!("{l}"));
    Ok(rows)
}

pub async fn cmd_worker_info(settings: &AppSettings, worker_id: &str) -> Result<WorkerDetail> {
    let client = connect(settings)?;
    let detail = client
        .worker_info(settings.instance_index, worker_id)
        .await
        .map_err(|e| read_failed("worker details", e))?;
    render_worker_detail(&detail)
        .iter()
        .for_each(|l| println!("{l}"));
    Ok(detail)
}

pub async fn cmd_memory(settings: &AppSettings) -> Result<MemoryUsage> {
    let client = connect(settings)?;
    let usage = client
        .redis_memory(settings.instance_index)
        .await
        .map_err(|e| read_failed("redis memory", e))?;
    println!(":: redis memory used: {}", usage.redis_memory_used);
    Ok(usage)
}

async fn queues_or_all(
    client: &MonitorClient,
    instance: usize,
    queues: Vec<String>,
) -> Result<Vec<String>> {
    if !queues.is_empty() {
        return Ok(queues);
    }
    client
        .queue_names(instance)
        .await
        .map_err(|e| read_failed("queue list", e))
}

fn statuses_or_all(statuses: Vec<String>) -> Vec<String> {
    if statuses.is_empty() {
        rqdash_config::JOB_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        statuses
    }
}

/// Sidebar state a bulk action should see as checked.
#[derive(Debug, Clone, Default)]
pub struct ActSelection {
    pub queues: Vec<String>,
    pub statuses: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ActReport {
    pub prompt: Prompt,
    /// `None` when the operator declined.
    pub outcome: Option<ModalOutcome>,
    /// Label of the suspend/resume control after the action.
    pub toggle_label: &'static str,
    pub lines: Vec<String>,
}

impl ActReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Some(ModalOutcome::Success { .. }))
    }
}

fn settle_timeout() -> Duration {
    Duration::from_secs(rqdash_config::HTTP_TIMEOUT_SECS + 5)
}

fn spinner(visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Runs one command through the confirmation dialog: compose the prompt, ask,
/// submit, then wait for the follow-up reloads to land.
pub async fn cmd_act(
    settings: AppSettings,
    request: CommandRequest,
    selection: ActSelection,
    confirm: impl FnOnce(&Prompt) -> Result<bool>,
    quiet: bool,
) -> Result<ActReport> {
    let client = connect(&settings)?;
    let view = if quiet {
        ConsoleView::new(client.clone()).quiet()
    } else {
        ConsoleView::new(client.clone())
    };
    let instance = settings.instance_index;
    let store = AppStore::new(AppState::with_settings(settings));
    let mut kernel = AppKernel::new(store.clone(), client.clone(), view.clone());

    if request.is_bulk() && request.target != TargetKind::Worker {
        let queues = queues_or_all(&client, instance, selection.queues).await?;
        kernel.preselect(SelectionGroup::Queues, &queues);
        kernel.preselect(SelectionGroup::JobStatuses, &statuses_or_all(selection.statuses));
    }

    let route = registry::route(&request)?;
    kernel.dispatch(AppCommand::OpenDialog(request))?;
    let prompt = store
        .read(|s| s.modal.prompt.clone())
        .ok_or_else(|| anyhow!("Dialog opened without a prompt"))?;

    if !confirm(&prompt)? {
        info!(title = %prompt.title, "declined");
        kernel.dispatch(AppCommand::CloseDialog)?;
        return Ok(ActReport {
            prompt,
            outcome: None,
            toggle_label: store.read(|s| s.suspend_toggle.label()),
            lines: view.lines(),
        });
    }

    let pb = spinner(!quiet)?;
    pb.set_message(format!("{} ...", prompt.title));
    kernel.dispatch(AppCommand::Confirm)?;

    tokio::time::timeout(settle_timeout(), async {
        while !store.read(|s| s.modal.phase.is_resolved()) {
            kernel.next_event().await;
        }
    })
    .await
    .context("Timed out waiting for the monitor to answer")?;

    let outcome = store.read(|s| s.modal.outcome.clone());
    pb.finish_and_clear();

    if matches!(outcome, Some(ModalOutcome::Success { .. }))
        && route.follow_up == Some(FollowUp::ReloadSidebar)
    {
        let waited = tokio::time::timeout(settle_timeout(), async {
            while view.sidebar_updates() == 0 {
                kernel.next_event().await;
            }
        })
        .await;
        if waited.is_err() {
            debug!("sidebar reload did not finish in time");
        }
    }

    let toggle_label = store.read(|s| s.suspend_toggle.label());
    kernel.dispatch(AppCommand::CloseDialog)?;
    view.drain().await;

    Ok(ActReport {
        prompt,
        outcome,
        toggle_label,
        lines: view.lines(),
    })
}
