use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Session start: request limits and draw the initial view.
    Started,
    /// Limits response; `None` when the service could not be reached.
    LimitsLoaded(Option<crate::ServiceLimits>),
    /// Files picked or dropped; replaces the local queue.
    FilesQueued(Vec<crate::QueuedFile>),
    /// Files appended to the local queue.
    FilesAdded(Vec<crate::QueuedFile>),
    /// User emptied the local queue.
    QueueCleared,
    /// User flipped the "only Aztec codes" toggle.
    OnlyAztecToggled(bool),
    /// User clicked Upload.
    UploadClicked,
    /// Submission accepted; one id per accepted file, in input order.
    UploadSucceeded { job_ids: Vec<crate::JobId> },
    /// Submission rejected or failed in transit.
    UploadFailed { message: String },
    /// A scheduled poll delay elapsed.
    PollDue { job_id: crate::JobId },
    /// Status response decoded for a job.
    PollSucceeded {
        job_id: crate::JobId,
        state: crate::JobState,
    },
    /// Status request failed in transport or decoding.
    PollFailed { job_id: crate::JobId, reason: String },
    /// User activated the copy action of a results row.
    CopyRequested { row: usize },
    /// User asked to save the accumulated results.
    ExportRequested { path: PathBuf },
    /// Export finished or failed; the outcome is shown until the next command.
    ExportFinished { message: String },
    /// User asked for the command list.
    HelpRequested,
    /// User typed something that is not a command.
    CommandRejected { input: String },
    /// UI/render tick.
    Tick,
}

impl Msg {
    /// Messages that come straight from the user. Any of them dismisses the
    /// alert or help text currently on screen.
    pub fn is_user_action(&self) -> bool {
        matches!(
            self,
            Msg::FilesQueued(_)
                | Msg::FilesAdded(_)
                | Msg::QueueCleared
                | Msg::OnlyAztecToggled(_)
                | Msg::UploadClicked
                | Msg::CopyRequested { .. }
                | Msg::ExportRequested { .. }
                | Msg::HelpRequested
                | Msg::CommandRejected { .. }
        )
    }
}
