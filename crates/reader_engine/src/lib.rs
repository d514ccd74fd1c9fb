//! Reader engine: HTTP access to the extraction service, poll timers and result export.
mod client;
mod engine;
mod export;
mod persist;
mod scheduler;
mod types;

pub use client::{ReqwestServiceClient, ServiceClient, ServiceSettings};
pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use export::{export_rows, ExportError, ExportFormat, ExportSummary};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use scheduler::{Scheduler, TokioScheduler};
pub use types::{
    EngineEvent, FailureKind, JobId, JobReport, ProgressReport, ResultRow, ServiceError,
    ServiceLimits, UploadFile,
};
