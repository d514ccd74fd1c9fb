use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchLimits,
    SubmitUpload {
        files: Vec<crate::QueuedFile>,
        only_aztec: bool,
    },
    FetchStatus {
        job_id: crate::JobId,
    },
    SchedulePoll {
        job_id: crate::JobId,
        delay: Duration,
    },
    /// User-facing message; the same text is kept on `AppState` for display.
    Alert {
        message: String,
    },
    CopyToClipboard {
        text: String,
    },
    ExportResults {
        path: PathBuf,
        rows: Vec<crate::ExtractionRow>,
    },
}
