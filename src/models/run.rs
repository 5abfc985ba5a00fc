// file: src/models/run.rs
// description: run records linking used and produced artifacts
// reference: internal data structures

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub job_type: String,
    pub config: serde_json::Value,
    #[serde(default)]
    pub used_artifacts: Vec<String>,
    #[serde(default)]
    pub logged_artifacts: Vec<String>,
    pub status: RunStatus,
    pub started_at: String,
    #[serde(default)]
    pub finished_at: Option<String>,
}

impl RunRecord {
    pub fn new(job_type: &str, config: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: job_type.to_string(),
            config,
            used_artifacts: Vec::new(),
            logged_artifacts: Vec::new(),
            status: RunStatus::Running,
            started_at: Utc::now().to_rfc3339(),
            finished_at: None,
        }
    }

    pub fn record_use(&mut self, qualified_name: String) {
        if !self.used_artifacts.contains(&qualified_name) {
            self.used_artifacts.push(qualified_name);
        }
    }

    pub fn record_output(&mut self, qualified_name: String) {
        self.logged_artifacts.push(qualified_name);
    }

    pub fn close(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now().to_rfc3339());
    }
}
