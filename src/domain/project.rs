//! Project progress tracking.
//!
//! A project carries a completion percentage, a status and an append-only
//! progress log. Updates are planned first (validated, serializable patch for
//! the `projects` table) and applied to the local copy once persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Upper bound of the completion percentage
pub const MAX_PROGRESS: u8 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Progress {0}% is out of range (0-100)")]
    ProgressOutOfRange(u8),

    #[error("Progress log records {log}% but the update sets {update}%")]
    LogMismatch { log: u8, update: u8 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a project's progress history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLog {
    pub date: DateTime<Utc>,
    pub description: String,
    pub progress: u8,
}

impl ProgressLog {
    pub fn now(description: impl Into<String>, progress: u8) -> Self {
        Self {
            date: Utc::now(),
            description: description.into(),
            progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub value: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub progress: u8,
    #[serde(default)]
    pub progress_logs: Vec<ProgressLog>,
    #[serde(default)]
    pub workers: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Validated patch for a project row.
///
/// `progress_logs` is only present when a log entry was added, and then holds
/// the full history with the new entry last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub progress: u8,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_logs: Option<Vec<ProgressLog>>,
}

impl Project {
    pub fn new(name: impl Into<String>, owner_id: Uuid, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            client_id: None,
            address: String::new(),
            project_type: String::new(),
            value: 0.0,
            start_date,
            end_date: None,
            status: ProjectStatus::Active,
            progress: 0,
            progress_logs: Vec::new(),
            workers: Vec::new(),
            notes: Vec::new(),
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Validate a progress change without touching the project
    pub fn plan_progress(
        &self,
        progress: u8,
        status: ProjectStatus,
        log: Option<ProgressLog>,
    ) -> Result<ProgressUpdate, ProjectError> {
        if progress > MAX_PROGRESS {
            return Err(ProjectError::ProgressOutOfRange(progress));
        }

        let progress_logs = match log {
            Some(entry) if entry.progress != progress => {
                return Err(ProjectError::LogMismatch {
                    log: entry.progress,
                    update: progress,
                });
            }
            Some(entry) => {
                let mut history = Vec::with_capacity(self.progress_logs.len() + 1);
                history.extend(self.progress_logs.iter().cloned());
                history.push(entry);
                Some(history)
            }
            None => None,
        };

        Ok(ProgressUpdate {
            progress,
            status,
            progress_logs,
        })
    }

    /// Merge a persisted update into the local copy
    pub fn apply_progress(&mut self, update: ProgressUpdate) {
        self.progress = update.progress;
        self.status = update.status;
        if let Some(history) = update.progress_logs {
            self.progress_logs = history;
        }
    }

    /// Plan and apply in one step; on error the project is left unchanged
    pub fn record_progress(
        &mut self,
        progress: u8,
        status: ProjectStatus,
        log: Option<ProgressLog>,
    ) -> Result<ProgressUpdate, ProjectError> {
        let update = self.plan_progress(progress, status, log)?;
        tracing::debug!(project = %self.id, progress, %status, "recording project progress");
        self.apply_progress(update.clone());
        Ok(update)
    }

    /// Latest logged progress entry, if any
    pub fn latest_log(&self) -> Option<&ProgressLog> {
        self.progress_logs.last()
    }
}
