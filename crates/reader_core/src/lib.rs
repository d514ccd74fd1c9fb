//! Reader core: pure job-lifecycle state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod poller;
mod registry;
mod results;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{ExtractionRow, JobId, JobState, JobStatus, Progress, QueuedFile, ServiceLimits};
pub use msg::Msg;
pub use poller::{PollDecision, Poller, PollerState, POLL_INTERVAL, RETRY_DELAY};
pub use registry::JobRegistry;
pub use results::ResultsAccumulator;
pub use state::{AppState, EMPTY_QUEUE_MESSAGE, UPLOAD_FAILED_MESSAGE};
pub use update::update;
pub use view_model::{AppViewModel, DownloadFormat, DownloadLink, JobRowView};
