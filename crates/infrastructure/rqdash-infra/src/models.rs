//! Wire shapes of the monitor's read endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every list endpoint wraps its rows in `data`; other keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRow {
    pub queue_name: String,
    #[serde(default)]
    pub job_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRow {
    pub worker_name: String,
    #[serde(default)]
    pub listening_on: String,
    pub status: String,
    #[serde(default)]
    pub host_ip: Option<String>,
    #[serde(default)]
    pub current_job_id: Option<String>,
    #[serde(default)]
    pub success_jobs: u64,
    #[serde(default)]
    pub failed_jobs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRow {
    pub job_info: JobInfo,
}

/// TTLs come back as seconds, or as a label such as `Infinite` or `500s`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ttl {
    Seconds(i64),
    Label(String),
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl::Label(String::new())
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Seconds(s) => write!(f, "{s}"),
            Ttl::Label(l) => f.write_str(l),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: String,
    #[serde(default)]
    pub job_func: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub job_exc_info: Option<String>,
    pub job_status: String,
    #[serde(default)]
    pub job_queue: String,
    #[serde(default)]
    pub job_ttl: Ttl,
    #[serde(default)]
    pub job_timeout: Ttl,
    #[serde(default)]
    pub job_result_ttl: Ttl,
    #[serde(default)]
    pub job_fail_ttl: Ttl,
}

/// `/workers/info` record. Dates are preformatted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerDetail {
    pub worker_name: String,
    pub worker_host_name: String,
    pub worker_ttl: Option<u64>,
    pub worker_result_ttl: Option<u64>,
    pub worker_birth_date: String,
    pub worker_death_date: String,
    pub worker_last_cleaned_at: String,
    pub worker_last_heartbeat: String,
    pub worker_failed_job_count: u64,
    pub worker_successful_job_count: u64,
    pub worker_job_monitoring_interval: Option<u64>,
    pub worker_current_job_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub redis_memory_used: String,
}
