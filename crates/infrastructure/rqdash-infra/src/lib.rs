pub mod models;
pub mod net;

// Re-exports for convenience
pub use models::{JobInfo, JobRow, MemoryUsage, QueueRow, Ttl, WorkerDetail, WorkerRow};
pub use net::{default_http_client, BasicAuth, MonitorClient, SiteMap, SiteMapError};
