mod error;
mod ingest;
mod manager;
mod preview;
mod stats;
mod task;
mod transport;
mod types;

pub use error::{PreviewError, SubmitError, TransportError, ValidationError};
pub use ingest::{
    guess_mime, AdmittedFile, CandidateFile, FileIngestor, FileSelection, FileSource,
    SelectionOrigin,
};
pub use manager::UploadQueueManager;
pub use preview::PreviewGenerator;
pub use stats::{aggregate, overall_progress, QueueStats};
pub use task::UploadTask;
pub use transport::{
    DriverFuture, ProgressSink, SimulatedTransport, Transport, TransportEvent, UploadJob,
};
pub use types::{
    BatchSummary, FileKind, Notification, TaskId, TaskView, UploadCategory, UploadSettings,
    UploadStatus,
};
