use share_uploader::upload::{BatchSummary, Notification, QueueStats};
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// View-only state of the upload page. Queue state lives in the manager.
#[derive(Debug, Default)]
pub struct PanelState {
    pub toasts: Vec<Toast>,
    pub show_details: bool,
    pub last_summary: Option<BatchSummary>,
    pub error_message: Option<String>,
}

impl PanelState {
    pub fn push_notifications(&mut self, notifications: Vec<Notification>, now: Instant) {
        self.toasts
            .extend(notifications.into_iter().map(|notification| Toast {
                notification,
                shown_at: now,
            }));
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| now.duration_since(toast.shown_at) < TOAST_LIFETIME);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.toasts.len() {
            self.toasts.remove(index);
        }
    }

    pub fn get_status_text(stats: &QueueStats) -> String {
        if stats.total_files == 0 {
            return String::new();
        }
        format!(
            "Progress: {}/{} files | ✅ Complete: {} | ⏳ In flight: {} | ❌ Failed: {}",
            stats.completed_count + stats.failed_count,
            stats.total_files,
            stats.completed_count,
            stats.in_flight_count,
            stats.failed_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let start = Instant::now();
        let mut state = PanelState::default();
        state.push_notifications(
            vec![
                Notification::Queued { count: 2 },
                Notification::BatchCompleted { count: 2 },
            ],
            start,
        );

        state.expire_toasts(start + Duration::from_secs(1));
        assert_eq!(state.toasts.len(), 2);

        state.dismiss(0);
        state.dismiss(5);
        assert_eq!(
            state.toasts[0].notification,
            Notification::BatchCompleted { count: 2 }
        );

        state.expire_toasts(start + TOAST_LIFETIME);
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn status_text_summarises_counts() {
        assert_eq!(PanelState::get_status_text(&QueueStats::default()), "");

        let stats = QueueStats {
            total_files: 4,
            total_bytes: 10,
            completed_count: 2,
            failed_count: 1,
            in_flight_count: 1,
        };
        assert_eq!(
            PanelState::get_status_text(&stats),
            "Progress: 3/4 files | ✅ Complete: 2 | ⏳ In flight: 1 | ❌ Failed: 1"
        );
    }
}
