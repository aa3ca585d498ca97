#![allow(dead_code)]

use rqdash_app_core::domain::{AppSettings, AppState, BrokerContext, ModalPhase};
use rqdash_app_core::ports::{BrokerApi, DashboardView, TableQuery};
use rqdash_app_core::{AppKernel, AppStore};
use rqdash_core::{ActionReply, EndpointKey, FormPayload, RemoteError, RouteEntry, TableKind};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct FakeBroker {
    pub calls: Arc<Mutex<Vec<(EndpointKey, FormPayload)>>>,
    pub queue_name_calls: Arc<Mutex<Vec<BrokerContext>>>,
    pub fail_with: Arc<Mutex<Option<RemoteError>>>,
}

impl FakeBroker {
    pub fn failing(error: RemoteError) -> Self {
        let broker = Self::default();
        *broker.fail_with.lock().unwrap() = Some(error);
        broker
    }

    pub fn calls(&self) -> Vec<(EndpointKey, FormPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BrokerApi for FakeBroker {
    async fn submit_action(
        &self,
        route: &'static RouteEntry,
        payload: FormPayload,
    ) -> Result<ActionReply, RemoteError> {
        self.calls.lock().unwrap().push((route.endpoint, payload));
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(ActionReply {
            message: format!("done: {}", route.endpoint.path()),
        })
    }

    async fn queue_names(&self, context: BrokerContext) -> Result<Vec<String>, RemoteError> {
        self.queue_name_calls.lock().unwrap().push(context);
        Ok(vec!["default".into(), "high".into()])
    }
}

#[derive(Clone, Default)]
pub struct RecordingView {
    pub reloads: Arc<Mutex<Vec<(TableKind, TableQuery)>>>,
    pub memory: Arc<Mutex<Vec<BrokerContext>>>,
    pub sidebars: Arc<Mutex<Vec<Vec<String>>>>,
    pub sidebar_errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingView {
    pub fn reloads(&self) -> Vec<(TableKind, TableQuery)> {
        self.reloads.lock().unwrap().clone()
    }
}

impl DashboardView for RecordingView {
    fn reload_table(&self, table: TableKind, query: TableQuery) {
        self.reloads.lock().unwrap().push((table, query));
    }

    fn refresh_memory(&self, context: BrokerContext) {
        self.memory.lock().unwrap().push(context);
    }

    fn sidebar_reloaded(&self, queues: &[String]) {
        self.sidebars.lock().unwrap().push(queues.to_vec());
    }

    fn sidebar_failed(&self, error: &RemoteError) {
        self.sidebar_errors.lock().unwrap().push(error.to_string());
    }
}

pub type TestKernel = AppKernel<FakeBroker, RecordingView>;

pub fn kernel_with(broker: FakeBroker, settings: AppSettings) -> (TestKernel, AppStore, RecordingView) {
    let store = AppStore::new(AppState::with_settings(settings));
    let view = RecordingView::default();
    let kernel = AppKernel::new(store.clone(), broker, view.clone());
    (kernel, store, view)
}

pub fn fast_dismiss() -> AppSettings {
    AppSettings {
        auto_dismiss_after_ms: 50,
        ..AppSettings::default()
    }
}

/// Pumps events until `done` holds or two seconds pass.
pub async fn pump_until(
    kernel: &mut TestKernel,
    store: &AppStore,
    done: impl Fn(&AppState) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !store.read(&done) {
            kernel.next_event().await;
        }
    })
    .await
    .expect("condition not reached in time");
}

pub async fn until_resolved(kernel: &mut TestKernel, store: &AppStore) {
    pump_until(kernel, store, |s| s.modal.phase.is_resolved()).await;
}

pub fn phase(store: &AppStore) -> ModalPhase {
    store.read(|s| s.modal.phase)
}
