use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, DownloadFormat, DownloadLink, JobRowView};
use crate::{
    ExtractionRow, JobId, JobRegistry, JobState, Poller, QueuedFile, ResultsAccumulator,
    ServiceLimits,
};

/// Alert shown when Upload is clicked with nothing queued.
pub const EMPTY_QUEUE_MESSAGE: &str = "Select PDF files.";
/// Alert shown when a failed submission carries no service detail.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    registry: JobRegistry,
    pollers: BTreeMap<JobId, Poller>,
    results: ResultsAccumulator,
    queue: Vec<QueuedFile>,
    only_aztec: bool,
    upload_in_flight: bool,
    limits_label: String,
    alert: Option<String>,
    help_visible: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_only_aztec(only_aztec: bool) -> Self {
        Self {
            only_aztec,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn results(&self) -> &ResultsAccumulator {
        &self.results
    }

    pub fn poller(&self, job_id: &str) -> Option<&Poller> {
        self.pollers.get(job_id)
    }

    pub fn queue(&self) -> &[QueuedFile] {
        &self.queue
    }

    pub fn only_aztec(&self) -> bool {
        self.only_aztec
    }

    pub fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// No upload is settling and no job is being tracked.
    pub fn is_idle(&self) -> bool {
        !self.upload_in_flight && self.registry.is_empty()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            limits_label: self.limits_label.clone(),
            queued_files: self.queue.iter().map(|f| f.name.clone()).collect(),
            only_aztec: self.only_aztec,
            upload_enabled: !self.upload_in_flight,
            jobs: self
                .registry
                .all()
                .map(|(job_id, job)| JobRowView {
                    job_id: job_id.clone(),
                    status: job.status.as_str().to_string(),
                    percent: job.progress.percent(),
                    note: job.progress.note.clone(),
                    downloads: [
                        DownloadLink::new(job_id, DownloadFormat::Json),
                        DownloadLink::new(job_id, DownloadFormat::Csv),
                    ],
                })
                .collect(),
            results: self.results.rows().to_vec(),
            alert: self.alert.clone(),
            show_help: self.help_visible,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
        self.mark_dirty();
    }

    pub(crate) fn show_help(&mut self) {
        self.help_visible = true;
        self.mark_dirty();
    }

    pub(crate) fn dismiss_notices(&mut self) {
        let had_alert = self.alert.take().is_some();
        let had_help = std::mem::take(&mut self.help_visible);
        if had_alert || had_help {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_limits(&mut self, limits: Option<ServiceLimits>) {
        self.limits_label = limits.map(|l| l.label()).unwrap_or_default();
        self.mark_dirty();
    }

    pub(crate) fn replace_queue(&mut self, files: Vec<QueuedFile>) {
        self.queue = files;
        self.mark_dirty();
    }

    pub(crate) fn extend_queue(&mut self, files: Vec<QueuedFile>) {
        self.queue.extend(files);
        self.mark_dirty();
    }

    pub(crate) fn set_only_aztec(&mut self, only_aztec: bool) {
        if self.only_aztec != only_aztec {
            self.only_aztec = only_aztec;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_upload_in_flight(&mut self, in_flight: bool) {
        if self.upload_in_flight != in_flight {
            self.upload_in_flight = in_flight;
            self.mark_dirty();
        }
    }

    /// Registers a freshly created job and its poller. Returns `false` for ids
    /// that are already tracked.
    pub(crate) fn register_job(&mut self, job_id: &str) -> bool {
        if self.pollers.contains_key(job_id) {
            return false;
        }
        self.registry.upsert(job_id, JobState::queued());
        self.pollers.insert(job_id.to_string(), Poller::new());
        self.mark_dirty();
        true
    }

    pub(crate) fn poller_mut(&mut self, job_id: &str) -> Option<&mut Poller> {
        self.pollers.get_mut(job_id)
    }

    pub(crate) fn update_job(&mut self, job_id: &str, state: JobState) {
        self.registry.upsert(job_id, state);
        self.mark_dirty();
    }

    /// Drops the job and releases its poller.
    pub(crate) fn retire_job(&mut self, job_id: &str) {
        self.registry.remove(job_id);
        self.pollers.remove(job_id);
        self.mark_dirty();
    }

    pub(crate) fn append_results(&mut self, rows: Vec<ExtractionRow>) -> usize {
        let appended = self.results.append(rows);
        if appended > 0 {
            self.mark_dirty();
        }
        appended
    }
}
