use rqdash_core::{
    ActionReply, FormPayload, RemoteError, RouteEntry, SelectionSnapshot, TableKind,
};

use crate::domain::{AppSettings, BrokerContext};

/// Everything a table reload needs, read at the moment of the reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub context: BrokerContext,
    pub selection: SelectionSnapshot,
}

/// Remote side of the dispatcher.
#[async_trait::async_trait]
pub trait BrokerApi: Send + Sync + 'static {
    async fn submit_action(
        &self,
        route: &'static RouteEntry,
        payload: FormPayload,
    ) -> Result<ActionReply, RemoteError>;

    async fn queue_names(&self, context: BrokerContext) -> Result<Vec<String>, RemoteError>;
}

/// Rendering side. Reloads are fire-and-forget: implementations fetch and
/// render on their own and report read failures in place of the table.
/// Paging is kept across reloads.
pub trait DashboardView: Send + Sync + 'static {
    fn reload_table(&self, table: TableKind, query: TableQuery);
    fn refresh_memory(&self, context: BrokerContext);
    fn sidebar_reloaded(&self, queues: &[String]);
    fn sidebar_failed(&self, error: &RemoteError);
}

pub trait SettingsRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<AppSettings>;
    fn save(&self, settings: &AppSettings) -> anyhow::Result<()>;
}
