use rqdash_app_core::domain::BrokerContext;
use rqdash_app_core::ports::{DashboardView, TableQuery};
use rqdash_app_core::viewmodel::worker_status_badge;
use rqdash_core::{RemoteError, TableKind};
use rqdash_infra::{JobRow, MonitorClient, QueueRow, WorkerDetail, WorkerRow};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::warn;

pub fn render_queues(rows: &[QueueRow]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No queues found.".into()];
    }
    let mut out = vec![
        format!("{:<32} {:>10}", "QUEUE", "JOBS"),
        format!("{:-<32} {:->10}", "", ""),
    ];
    out.extend(
        rows.iter()
            .map(|q| format!("{:<32} {:>10}", q.queue_name, q.job_count)),
    );
    out
}

pub fn render_workers(rows: &[WorkerRow]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No workers found.".into()];
    }
    let mut out = vec![
        format!(
            "{:<36} {:<24} {:<22} {:>8} {:>8}",
            "WORKER", "QUEUES", "STATUS", "OK", "FAILED"
        ),
        format!("{:-<36} {:-<24} {:-<22} {:->8} {:->8}", "", "", "", "", ""),
    ];
    for w in rows {
        let status = format!("{} [{}]", w.status, worker_status_badge(&w.status).as_str());
        out.push(format!(
            "{:<36} {:<24} {:<22} {:>8} {:>8}",
            w.worker_name, w.listening_on, status, w.success_jobs, w.failed_jobs
        ));
    }
    out
}

pub fn render_jobs(rows: &[JobRow]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No jobs match the selection.".into()];
    }
    let mut out = vec![
        format!(
            "{:<38} {:<16} {:<10} {:<28} {:>10}",
            "JOB", "QUEUE", "STATUS", "FUNC", "TIMEOUT"
        ),
        format!("{:-<38} {:-<16} {:-<10} {:-<28} {:->10}", "", "", "", "", ""),
    ];
    for row in rows {
        let j = &row.job_info;
        out.push(format!(
            "{:<38} {:<16} {:<10} {:<28} {:>10}",
            j.job_id,
            j.job_queue,
            j.job_status,
            j.job_func.as_deref().unwrap_or("-"),
            j.job_timeout
        ));
    }
    out
}

pub fn render_worker_detail(w: &WorkerDetail) -> Vec<String> {
    let opt = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    vec![
        format!("Name:            {}", w.worker_name),
        format!("Host:            {}", w.worker_host_name),
        format!("Current job:     {}", w.worker_current_job_id.as_deref().unwrap_or("-")),
        format!("Successful jobs: {}", w.worker_successful_job_count),
        format!("Failed jobs:     {}", w.worker_failed_job_count),
        format!("Worker TTL:      {}", opt(w.worker_ttl)),
        format!("Result TTL:      {}", opt(w.worker_result_ttl)),
        format!("Monitor every:   {}", opt(w.worker_job_monitoring_interval)),
        format!("Born:            {}", w.worker_birth_date),
        format!("Died:            {}", w.worker_death_date),
        format!("Last cleaned:    {}", w.worker_last_cleaned_at),
        format!("Last heartbeat:  {}", w.worker_last_heartbeat),
    ]
}

/// Read-path failures replace the table with this block.
pub fn render_failure(what: &str, err: &RemoteError) -> Vec<String> {
    let mut out = vec![format!("!! could not load {what}: {}", err.message())];
    if let Some(label) = err.status_label() {
        out.push(format!("   status: {label}"));
    }
    if let Some(tb) = err.traceback() {
        out.extend(tb.lines().map(|l| format!("   {l}")));
    }
    out
}

/// Prints dashboard reloads to stdout. Every printed line is also kept so the
/// caller can inspect what was shown.
#[derive(Clone)]
pub struct ConsoleView {
    client: MonitorClient,
    lines: Arc<Mutex<Vec<String>>>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    sidebar_updates: Arc<AtomicUsize>,
    quiet: bool,
}

impl ConsoleView {
    pub fn new(client: MonitorClient) -> Self {
        Self {
            client,
            lines: Arc::default(),
            tasks: Arc::default(),
            sidebar_updates: Arc::default(),
            quiet: false,
        }
    }

    /// Keeps lines without printing them.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sidebar_updates(&self) -> usize {
        self.sidebar_updates.load(Ordering::SeqCst)
    }

    fn emit(&self, lines: Vec<String>) {
        emit_to(&self.lines, self.quiet, lines);
    }

    fn spawn(&self, fut: impl std::future::Future<Output = ()> + Send + 'static) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self
                .tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(handle.spawn(fut)),
            Err(_) => warn!("no runtime to refresh the console on"),
        }
    }

    /// Waits for every reload started so far.
    pub async fn drain(&self) {
        loop {
            let pending: Vec<_> = std::mem::take(
                &mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner),
            );
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                let _ = handle.await;
            }
        }
    }
}

fn emit_to(sink: &Mutex<Vec<String>>, quiet: bool, lines: Vec<String>) {
    if !quiet {
        for line in &lines {
            println!("{line}");
        }
    }
    sink.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .extend(lines);
}

impl DashboardView for ConsoleView {
    fn reload_table(&self, table: TableKind, query: TableQuery) {
        let client = self.client.clone();
        let sink = self.lines.clone();
        let quiet = self.quiet;
        let instance = query.context.instance_index;

        self.spawn(async move {
            let mut lines = vec![format!(":: {table} (instance {instance})")];
            let rendered = match table {
                TableKind::Queues => client.list_queues(instance).await.map(|r| render_queues(&r)),
                TableKind::Workers => client
                    .list_workers(instance)
                    .await
                    .map(|r| render_workers(&r)),
                TableKind::Jobs => client
                    .list_jobs(instance, &query.selection)
                    .await
                    .map(|r| render_jobs(&r)),
            };
            lines.extend(rendered.unwrap_or_else(|e| render_failure(table.as_str(), &e)));
            emit_to(&sink, quiet, lines);
        });
    }

    fn refresh_memory(&self, context: BrokerContext) {
        let client = self.client.clone();
        let sink = self.lines.clone();
        let quiet = self.quiet;

        self.spawn(async move {
            let lines = match client.redis_memory(context.instance_index).await {
                Ok(m) => vec![format!(":: redis memory used: {}", m.redis_memory_used)],
                Err(e) => render_failure("redis memory", &e),
            };
            emit_to(&sink, quiet, lines);
        });
    }

    fn sidebar_reloaded(&self, queues: &[String]) {
        self.sidebar_updates.fetch_add(1, Ordering::SeqCst);
        self.emit(vec![format!(":: queues: {}", queues.join(", "))]);
    }

    fn sidebar_failed(&self, error: &RemoteError) {
        self.sidebar_updates.fetch_add(1, Ordering::SeqCst);
        self.emit(render_failure("queue list", error));
    }
}
