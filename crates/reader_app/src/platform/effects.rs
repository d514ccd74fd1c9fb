use std::sync::mpsc;
use std::thread;

use reader_core::{
    Effect, ExtractionRow, JobState, JobStatus, Msg, Progress, QueuedFile, ServiceLimits,
    RETRY_DELAY,
};
use reader_engine::{
    export_rows, EngineEvent, EngineEvents, EngineHandle, FailureKind, JobReport, ResultRow,
    ServiceError, UploadFile,
};
use reader_logging::{reader_debug, reader_error, reader_info, reader_warn};

use super::app::AppEvent;
use super::clipboard::Clipboard;

pub struct EffectRunner {
    engine: EngineHandle,
    clipboard: Box<dyn Clipboard>,
    /// Outcomes that must reach the screen go back through the app loop.
    feedback: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        clipboard: Box<dyn Clipboard>,
        feedback: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            engine,
            clipboard,
            feedback,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchLimits => self.engine.fetch_limits(),
                Effect::SubmitUpload { files, only_aztec } => {
                    reader_info!(
                        "Uploading {} file(s), only_aztec={}",
                        files.len(),
                        only_aztec
                    );
                    self.engine.submit(to_upload_files(files), only_aztec);
                }
                Effect::FetchStatus { job_id } => {
                    reader_debug!("Polling job {}", job_id);
                    self.engine.fetch_status(job_id);
                }
                Effect::SchedulePoll { job_id, delay } => {
                    self.engine.schedule_poll(job_id, delay);
                }
                Effect::Alert { message } => reader_warn!("Alert: {}", message),
                Effect::CopyToClipboard { text } => match self.clipboard.copy(&text) {
                    Ok(()) => reader_info!("Copied {} chars to clipboard", text.chars().count()),
                    Err(err) => reader_error!("Clipboard copy failed: {}", err),
                },
                Effect::ExportResults { path, rows } => {
                    let message = match export_rows(&path, &to_result_rows(rows)) {
                        Ok(summary) => {
                            reader_info!(
                                "Exported {} row(s) to {:?}",
                                summary.row_count,
                                summary.output_path
                            );
                            format!(
                                "Saved {} row(s) to {}",
                                summary.row_count,
                                summary.output_path.display()
                            )
                        }
                        Err(err) => {
                            reader_error!("Export to {:?} failed: {}", path, err);
                            format!("Could not save results: {err}")
                        }
                    };
                    let _ = self
                        .feedback
                        .send(AppEvent::Msg(Msg::ExportFinished { message }));
                }
            }
        }
    }
}

/// Forwards engine events into the application loop as messages.
pub fn spawn_event_forwarder(events: EngineEvents, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if tx.send(AppEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::LimitsFetched(Ok(limits)) => {
            reader_info!("Service limits: {:?}", limits);
            Msg::LimitsLoaded(Some(ServiceLimits {
                max_file_size_mb: limits.max_file_size_mb,
                max_pages: limits.max_pages,
                job_timeout_seconds: limits.job_timeout_seconds,
            }))
        }
        EngineEvent::LimitsFetched(Err(err)) => {
            reader_warn!("Service limits unavailable: {}", err);
            Msg::LimitsLoaded(None)
        }
        EngineEvent::UploadCompleted(Ok(job_ids)) => {
            reader_info!("Upload accepted, jobs {:?}", job_ids);
            Msg::UploadSucceeded { job_ids }
        }
        EngineEvent::UploadCompleted(Err(err)) => {
            reader_warn!("Upload failed: {}", err);
            Msg::UploadFailed {
                message: upload_failure_message(err),
            }
        }
        EngineEvent::StatusFetched {
            job_id,
            result: Ok(report),
        } => {
            let state = to_job_state(report);
            match &state.status {
                JobStatus::Finished => reader_info!(
                    "Job {} finished with {} row(s)",
                    job_id,
                    state.result.as_ref().map_or(0, Vec::len)
                ),
                JobStatus::Failed => reader_warn!(
                    "Job {} failed: {}",
                    job_id,
                    state.error.as_deref().unwrap_or("no reason given")
                ),
                status => reader_debug!(
                    "Job {} is {} ({}/{})",
                    job_id,
                    status,
                    state.progress.done,
                    state.progress.total
                ),
            }
            Msg::PollSucceeded { job_id, state }
        }
        EngineEvent::StatusFetched {
            job_id,
            result: Err(err),
        } => {
            reader_warn!(
                "Polling job {} failed: {}; retrying in {:?}",
                job_id,
                err,
                RETRY_DELAY
            );
            Msg::PollFailed {
                job_id,
                reason: err.to_string(),
            }
        }
        EngineEvent::PollDue { job_id, waited } => {
            reader_debug!("Poll due for job {} after {:?}", job_id, waited);
            Msg::PollDue { job_id }
        }
    }
}

/// Rejections show the service's detail (empty lets the core use its generic
/// text); transport failures show the error itself.
fn upload_failure_message(err: ServiceError) -> String {
    match err.kind {
        FailureKind::HttpStatus(_) | FailureKind::Decode => err.detail.unwrap_or_default(),
        _ => err.to_string(),
    }
}

fn to_job_state(report: JobReport) -> JobState {
    JobState {
        status: JobStatus::parse(&report.status),
        progress: Progress {
            done: report.progress.done,
            total: report.progress.total,
            note: report.progress.note,
        },
        result: report.result.map(|rows| {
            rows.into_iter()
                .map(|row| ExtractionRow {
                    file: row.file,
                    page: row.page,
                    format: row.format,
                    text: row.text,
                })
                .collect()
        }),
        error: report.error,
    }
}

fn to_upload_files(files: Vec<QueuedFile>) -> Vec<UploadFile> {
    files
        .into_iter()
        .map(|file| UploadFile {
            path: file.path,
            name: file.name,
        })
        .collect()
}

fn to_result_rows(rows: Vec<ExtractionRow>) -> Vec<ResultRow> {
    rows.into_iter()
        .map(|row| ResultRow {
            file: row.file,
            page: row.page,
            format: row.format,
            text: row.text,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_engine::ProgressReport;

    fn rejected(detail: Option<&str>) -> ServiceError {
        ServiceError {
            kind: FailureKind::HttpStatus(400),
            message: "400 Bad Request".to_string(),
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn upload_rejection_uses_service_detail() {
        let msg = map_event(EngineEvent::UploadCompleted(Err(rejected(Some(
            "Only PDF files are supported",
        )))));
        assert_eq!(
            msg,
            Msg::UploadFailed {
                message: "Only PDF files are supported".to_string()
            }
        );
    }

    #[test]
    fn upload_rejection_without_detail_defers_to_core_fallback() {
        let msg = map_event(EngineEvent::UploadCompleted(Err(rejected(None))));
        assert_eq!(
            msg,
            Msg::UploadFailed {
                message: String::new()
            }
        );
    }

    #[test]
    fn transport_failure_message_names_the_error() {
        let err = ServiceError {
            kind: FailureKind::Network,
            message: "connection refused".to_string(),
            detail: None,
        };
        let Msg::UploadFailed { message } = map_event(EngineEvent::UploadCompleted(Err(err)))
        else {
            panic!("expected UploadFailed");
        };
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn status_report_becomes_job_state() {
        let msg = map_event(EngineEvent::StatusFetched {
            job_id: "j1".to_string(),
            result: Ok(JobReport {
                status: "started".to_string(),
                progress: ProgressReport {
                    done: 1,
                    total: 4,
                    note: "Page 2/4".to_string(),
                },
                result: None,
                error: None,
            }),
        });
        assert_eq!(
            msg,
            Msg::PollSucceeded {
                job_id: "j1".to_string(),
                state: JobState {
                    status: JobStatus::InProgress("started".to_string()),
                    progress: Progress {
                        done: 1,
                        total: 4,
                        note: "Page 2/4".to_string(),
                    },
                    result: None,
                    error: None,
                },
            }
        );
    }

    #[test]
    fn status_errors_become_poll_failures() {
        let msg = map_event(EngineEvent::StatusFetched {
            job_id: "j1".to_string(),
            result: Err(ServiceError {
                kind: FailureKind::Decode,
                message: "expected value".to_string(),
                detail: None,
            }),
        });
        assert!(matches!(msg, Msg::PollFailed { job_id, .. } if job_id == "j1"));
    }
}
