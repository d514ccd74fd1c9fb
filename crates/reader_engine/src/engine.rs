use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use reader_logging::{reader_debug, reader_info};

use crate::client::{ReqwestServiceClient, ServiceClient, ServiceSettings};
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::{EngineEvent, JobId, ServiceError, UploadFile};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("service client: {0}")]
    Service(#[from] ServiceError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    FetchLimits,
    Submit {
        files: Vec<UploadFile>,
        only_aztec: bool,
    },
    FetchStatus {
        job_id: JobId,
    },
    SchedulePoll {
        job_id: JobId,
        delay: Duration,
    },
}

/// Sends work to the engine thread. Every command resolves to exactly one
/// [`EngineEvent`] on the paired [`EngineEvents`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings) -> Result<(Self, EngineEvents), EngineError> {
        let client = ReqwestServiceClient::new(settings)?;
        Self::with_services(Arc::new(client), Arc::new(TokioScheduler))
    }

    pub fn with_services(
        client: Arc<dyn ServiceClient>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("reader-engine")
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let scheduler = scheduler.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), scheduler.as_ref(), command, event_tx).await;
                });
            }
            reader_info!("Engine command channel closed; shutting down");
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn fetch_limits(&self) {
        let _ = self.cmd_tx.send(EngineCommand::FetchLimits);
    }

    pub fn submit(&self, files: Vec<UploadFile>, only_aztec: bool) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { files, only_aztec });
    }

    pub fn fetch_status(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchStatus {
            job_id: job_id.into(),
        });
    }

    pub fn schedule_poll(&self, job_id: impl Into<JobId>, delay: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::SchedulePoll {
            job_id: job_id.into(),
            delay,
        });
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    client: &dyn ServiceClient,
    scheduler: &dyn Scheduler,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchLimits => EngineEvent::LimitsFetched(client.limits().await),
        EngineCommand::Submit { files, only_aztec } => {
            reader_debug!(
                "Submitting {} file(s), only_aztec={}",
                files.len(),
                only_aztec
            );
            EngineEvent::UploadCompleted(client.create_jobs(&files, only_aztec).await)
        }
        EngineCommand::FetchStatus { job_id } => {
            let result = client.job_status(&job_id).await;
            EngineEvent::StatusFetched { job_id, result }
        }
        EngineCommand::SchedulePoll { job_id, delay } => {
            scheduler.after(delay).await;
            EngineEvent::PollDue {
                job_id,
                waited: delay,
            }
        }
    };
    let _ = event_tx.send(event);
}
