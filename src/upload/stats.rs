use super::types::{TaskView, UploadStatus};
use serde::Serialize;

/// Aggregate counters over a snapshot. Holds no state of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QueueStats {
    pub total_files: usize,
    pub total_bytes: u64,
    pub completed_count: usize,
    pub failed_count: usize,
    pub in_flight_count: usize,
}

pub fn aggregate(snapshot: &[TaskView]) -> QueueStats {
    snapshot.iter().fold(
        QueueStats {
            total_files: snapshot.len(),
            ..QueueStats::default()
        },
        |mut stats, task| {
            stats.total_bytes += task.size;
            match task.status {
                UploadStatus::Completed => stats.completed_count += 1,
                UploadStatus::Errored => stats.failed_count += 1,
                UploadStatus::Queued | UploadStatus::Uploading => stats.in_flight_count += 1,
                UploadStatus::Cancelled => {}
            }
            stats
        },
    )
}

/// Mean progress across all tasks, in `0.0..=1.0`.
pub fn overall_progress(snapshot: &[TaskView]) -> f32 {
    if snapshot.is_empty() {
        return 0.0;
    }
    let sum: f32 = snapshot.iter().map(|task| task.progress).sum();
    sum / (snapshot.len() as f32 * 100.0)
}
