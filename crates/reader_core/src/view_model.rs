use crate::{ExtractionRow, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub limits_label: String,
    pub queued_files: Vec<String>,
    pub only_aztec: bool,
    pub upload_enabled: bool,
    pub jobs: Vec<JobRowView>,
    pub results: Vec<ExtractionRow>,
    /// Stays on screen until the next user command.
    pub alert: Option<String>,
    pub show_help: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    /// Raw service status, used as the badge text.
    pub status: String,
    pub percent: u64,
    pub note: String,
    pub downloads: [DownloadLink; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Json,
    Csv,
}

impl DownloadFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadFormat::Json => "json",
            DownloadFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadFormat::Json => "JSON",
            DownloadFormat::Csv => "CSV",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub format: DownloadFormat,
    /// Service-relative path, e.g. `/api/jobs/{id}/download?fmt=csv`.
    pub path: String,
}

impl DownloadLink {
    pub fn new(job_id: &str, format: DownloadFormat) -> Self {
        Self {
            format,
            path: format!("/api/jobs/{job_id}/download?fmt={}", format.as_str()),
        }
    }
}
