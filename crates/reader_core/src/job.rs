use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier assigned by the extraction service when a job is created.
pub type JobId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    /// Any service-defined status that is neither queued nor terminal.
    InProgress(String),
    Finished,
    Failed,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => JobStatus::Queued,
            "finished" => JobStatus::Finished,
            "failed" => JobStatus::Failed,
            other => JobStatus::InProgress(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::InProgress(raw) => raw,
            JobStatus::Finished => "finished",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub done: u64,
    pub total: u64,
    pub note: String,
}

impl Progress {
    /// Progress-bar fill, `round(100 * done / total)`, or 0 when nothing is known yet.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        // Integer half-up rounding.
        (200 * self.done + self.total) / (2 * self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRow {
    pub file: String,
    pub page: String,
    pub format: String,
    pub text: String,
}

/// Full job state as last reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobState {
    pub status: JobStatus,
    pub progress: Progress,
    pub result: Option<Vec<ExtractionRow>>,
    /// Failure reason reported alongside `failed`; logged, never rendered.
    pub error: Option<String>,
}

impl JobState {
    /// State of a job the instant the service hands out its id.
    pub fn queued() -> Self {
        Self {
            status: JobStatus::Queued,
            progress: Progress::default(),
            result: None,
            error: None,
        }
    }
}

/// A local file waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedFile {
    pub path: PathBuf,
    pub name: String,
}

impl QueuedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLimits {
    pub max_file_size_mb: u64,
    pub max_pages: u64,
    pub job_timeout_seconds: u64,
}

impl ServiceLimits {
    pub fn label(&self) -> String {
        format!(
            "Limit: {}MB, {} pages, timeout {}s",
            self.max_file_size_mb, self.max_pages, self.job_timeout_seconds
        )
    }
}
