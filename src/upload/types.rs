use super::error::{TransportError, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Queue-unique task identifier. Allocated from a counter that only moves
/// forward, so an evicted id is never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UploadStatus {
    Queued,
    Uploading,
    Completed,
    Errored,
    Cancelled,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored | Self::Cancelled)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Uploading => "Uploading",
            Self::Completed => "Complete",
            Self::Errored => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Coarse grouping of MIME types, used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Archive,
    Document,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime.contains("zip") || mime.contains("rar") || mime.contains("archive") {
            Self::Archive
        } else {
            Self::Document
        }
    }
}

/// Read-only projection of one task. The presentation layer only ever sees
/// these, never the manager's own records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub kind: FileKind,
    pub status: UploadStatus,
    pub progress: f32,
    pub preview_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Discrete user-facing messages, rendered as toasts.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Queued { count: usize },
    Rejected { name: String, error: ValidationError },
    Failed { id: TaskId, name: String, error: TransportError },
    Removed { id: TaskId, name: String },
    BatchCompleted { count: usize },
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Queued { .. } => "Files added",
            Self::Rejected { .. } => "File rejected",
            Self::Failed { .. } => "Upload failed",
            Self::Removed { .. } => "File removed",
            Self::BatchCompleted { .. } => "Upload completed",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Queued { count } => format!("{} file(s) added to the upload queue.", count),
            Self::Rejected { name, error } => format!("{}: {}", name, error),
            Self::Failed { name, error, .. } => format!("{}: {}", name, error),
            Self::Removed { name, .. } => format!("{} has been removed from upload queue.", name),
            Self::BatchCompleted { count } => {
                format!("{} file(s) have been uploaded successfully.", count)
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UploadCategory {
    Documents,
    Images,
    Videos,
    Audio,
    Archives,
    #[default]
    Other,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 6] = [
        Self::Documents,
        Self::Images,
        Self::Videos,
        Self::Audio,
        Self::Archives,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Other => "Other",
        }
    }
}

/// Batch-level options chosen alongside the files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSettings {
    pub category: UploadCategory,
    pub description: String,
    pub private: bool,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            category: UploadCategory::default(),
            description: String::new(),
            private: true,
        }
    }
}

/// What `complete_batch` hands to the submit collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub files: Vec<TaskView>,
    pub total_bytes: u64,
    pub settings: UploadSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_mime_prefix() {
        assert_eq!(FileKind::from_mime("image/png"), FileKind::Image);
        assert_eq!(FileKind::from_mime("video/mp4"), FileKind::Video);
        assert_eq!(FileKind::from_mime("audio/mpeg"), FileKind::Audio);
        assert_eq!(FileKind::from_mime("application/zip"), FileKind::Archive);
        assert_eq!(FileKind::from_mime("application/vnd.rar"), FileKind::Archive);
        assert_eq!(FileKind::from_mime("text/plain"), FileKind::Document);
        assert_eq!(FileKind::from_mime(""), FileKind::Document);
    }

    #[test]
    fn only_final_states_are_terminal() {
        assert!(!UploadStatus::Queued.is_terminal());
        assert!(!UploadStatus::Uploading.is_terminal());
        assert!(UploadStatus::Completed.is_terminal());
        assert!(UploadStatus::Errored.is_terminal());
        assert!(UploadStatus::Cancelled.is_terminal());
    }

    #[test]
    fn task_ids_display_with_prefix() {
        assert_eq!(TaskId(7).to_string(), "upload-7");
    }
}
