use super::error::TransportError;
use super::ingest::AdmittedFile;
use super::types::{FileKind, TaskId, TaskView, UploadStatus};
use chrono::{DateTime, Utc};

pub const COMPLETE: f32 = 100.0;

/// Per-file lifecycle record. Only the queue manager holds these; every
/// transition method reports whether anything changed so stale or
/// out-of-order events can be dropped without special casing.
#[derive(Debug, Clone)]
pub struct UploadTask {
    id: TaskId,
    file: AdmittedFile,
    status: UploadStatus,
    progress: f32,
    preview_uri: Option<String>,
    created_at: DateTime<Utc>,
    failure: Option<TransportError>,
}

impl UploadTask {
    pub fn new(id: TaskId, file: AdmittedFile) -> Self {
        Self {
            id,
            file,
            status: UploadStatus::Queued,
            progress: 0.0,
            preview_uri: None,
            created_at: Utc::now(),
            failure: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn file(&self) -> &AdmittedFile {
        &self.file
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn preview_uri(&self) -> Option<&str> {
        self.preview_uri.as_deref()
    }

    pub fn failure(&self) -> Option<&TransportError> {
        self.failure.as_ref()
    }

    /// Queued -> Uploading.
    pub fn begin(&mut self) -> bool {
        if self.status != UploadStatus::Queued {
            return false;
        }
        self.status = UploadStatus::Uploading;
        true
    }

    /// Applies a progress tick. Values below the current progress are
    /// ignored; a value at or past 100 lands on exactly 100 and completes
    /// the task in the same step.
    pub fn advance(&mut self, value: f32) -> bool {
        if self.status.is_terminal() || !value.is_finite() {
            return false;
        }

        let started = self.begin();
        if value >= COMPLETE {
            return self.complete();
        }
        if value > self.progress {
            self.progress = value;
            return true;
        }
        started
    }

    pub fn complete(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.progress = COMPLETE;
        self.status = UploadStatus::Completed;
        true
    }

    /// Freezes progress where it is.
    pub fn fail(&mut self, error: TransportError) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = UploadStatus::Errored;
        self.failure = Some(error);
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = UploadStatus::Cancelled;
        true
    }

    /// First preview wins; a cancelled task takes none.
    pub fn attach_preview(&mut self, uri: String) -> bool {
        if self.status == UploadStatus::Cancelled || self.preview_uri.is_some() {
            return false;
        }
        self.preview_uri = Some(uri);
        true
    }

    pub fn view(&self) -> TaskView {
        TaskView {
            id: self.id,
            name: self.file.name.clone(),
            size: self.file.size,
            mime_type: self.file.mime_type.clone(),
            kind: FileKind::from_mime(&self.file.mime_type),
            status: self.status,
            progress: self.progress,
            preview_uri: self.preview_uri.clone(),
            created_at: self.created_at,
            error: self.failure.as_ref().map(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::ingest::{CandidateFile, FileIngestor};

    fn task() -> UploadTask {
        let file = FileIngestor::new(u64::MAX)
            .admit(vec![CandidateFile::from_bytes("a.bin", vec![0u8; 4].into())])
            .pop()
            .unwrap()
            .unwrap();
        UploadTask::new(TaskId(1), file)
    }

    #[test]
    fn starts_queued_at_zero() {
        let task = task();
        assert_eq!(task.status(), UploadStatus::Queued);
        assert_eq!(task.progress(), 0.0);
        assert!(task.preview_uri().is_none());
    }

    #[test]
    fn first_tick_starts_the_upload() {
        let mut task = task();
        assert!(task.advance(12.5));
        assert_eq!(task.status(), UploadStatus::Uploading);
        assert_eq!(task.progress(), 12.5);
    }

    #[test]
    fn progress_never_goes_backwards() {
        let mut task = task();
        task.begin();
        assert!(task.advance(40.0));
        assert!(!task.advance(30.0));
        assert!(!task.advance(40.0));
        assert!(!task.advance(f32::NAN));
        assert_eq!(task.progress(), 40.0);
        assert!(task.advance(41.0));
    }

    #[test]
    fn overshooting_tick_completes_at_exactly_100() {
        let mut task = task();
        task.advance(95.0);
        assert!(task.advance(113.7));
        assert_eq!(task.status(), UploadStatus::Completed);
        assert_eq!(task.progress(), COMPLETE);
    }

    #[test]
    fn terminal_states_are_frozen() {
        let mut done = task();
        done.complete();
        assert!(!done.advance(50.0));
        assert!(!done.fail(TransportError::DriverExited));
        assert!(!done.cancel());
        assert!(!done.begin());
        assert_eq!(done.status(), UploadStatus::Completed);
        assert_eq!(done.progress(), COMPLETE);

        let mut failed = task();
        failed.advance(33.0);
        assert!(failed.fail(TransportError::Failed("reset".into())));
        assert!(!failed.advance(80.0));
        assert!(!failed.complete());
        assert_eq!(failed.status(), UploadStatus::Errored);
        assert_eq!(failed.progress(), 33.0);
        assert_eq!(
            failed.view().error.as_deref(),
            Some("transfer failed: reset")
        );
    }

    #[test]
    fn cancel_is_reachable_from_queued_and_uploading() {
        let mut queued = task();
        assert!(queued.cancel());
        assert_eq!(queued.status(), UploadStatus::Cancelled);

        let mut uploading = task();
        uploading.advance(10.0);
        assert!(uploading.cancel());
        assert_eq!(uploading.status(), UploadStatus::Cancelled);
        assert_eq!(uploading.progress(), 10.0);
    }

    #[test]
    fn preview_attaches_once_and_survives_completion() {
        let mut task = task();
        task.complete();
        assert!(task.attach_preview("data:a".into()));
        assert!(!task.attach_preview("data:b".into()));
        assert_eq!(task.preview_uri(), Some("data:a"));
    }
}
