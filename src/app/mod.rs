mod palette;
mod state;
mod ui;

use eframe::{egui, App};
use share_uploader::config::UploaderConfig;
use share_uploader::upload::{
    CandidateFile, FileSelection, SelectionOrigin, TaskId, UploadQueueManager,
};
use state::PanelState;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

pub struct UploaderApp {
    // dropped before the runtime so drivers are aborted first
    queue: UploadQueueManager,
    state: PanelState,
    _runtime: Runtime,
}

impl UploaderApp {
    pub fn new(config: UploaderConfig) -> io::Result<Self> {
        info!("Initializing file uploader");
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let queue = UploadQueueManager::with_simulated_transport(&config, runtime.handle().clone());

        Ok(Self {
            queue,
            state: PanelState::default(),
            _runtime: runtime,
        })
    }

    pub fn browse_files(&mut self) {
        if let Some(paths) = rfd::FileDialog::new().pick_files() {
            self.enqueue_paths(SelectionOrigin::Picker, &paths);
        }
    }

    fn enqueue_paths(&mut self, origin: SelectionOrigin, paths: &[PathBuf]) {
        let selection = FileSelection::from_paths(origin, paths);
        if selection.files.is_empty() {
            warn!("Selection contained no readable files");
            return;
        }
        self.queue.enqueue(selection);
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut paths = Vec::new();
        let mut in_memory = Vec::new();
        for file in dropped {
            match (file.path, file.bytes) {
                (Some(path), _) => paths.push(path),
                (None, Some(bytes)) => in_memory.push(dropped_bytes(file.name, file.mime, bytes)),
                (None, None) => warn!("Dropped file {} has neither path nor contents", file.name),
            }
        }

        let mut selection = FileSelection::from_paths(SelectionOrigin::DragDrop, &paths);
        selection.files.extend(in_memory);
        if !selection.files.is_empty() {
            self.queue.enqueue(selection);
        }
    }

    pub fn remove_file(&mut self, id: TaskId) {
        self.queue.remove(id);
    }

    pub fn complete_upload(&mut self) {
        match self.queue.complete_batch() {
            Ok(summary) => {
                self.state.error_message = None;
                self.state.last_summary = Some(summary);
            }
            Err(e) => {
                warn!("Cannot complete upload: {}", e);
                self.state.error_message = Some(e.to_string());
            }
        }
    }

    pub fn reset_upload_state(&mut self) {
        info!("Clearing upload queue");
        self.queue.clear();
        self.queue.drain_notifications();
        self.state = PanelState::default();
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);

        let applied = self.queue.process_pending();
        let now = Instant::now();
        self.state
            .push_notifications(self.queue.drain_notifications(), now);
        self.state.expire_toasts(now);

        if applied > 0 {
            ctx.request_repaint();
        }
        if self.queue.stats().in_flight_count > 0 || !self.state.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// In-memory drop (web builds). The platform's MIME type wins over the
/// extension guess when it has one.
fn dropped_bytes(name: String, mime: String, bytes: Arc<[u8]>) -> CandidateFile {
    let candidate = CandidateFile::from_bytes(name, bytes);
    if mime.is_empty() {
        candidate
    } else {
        candidate.with_mime_type(mime)
    }
}

impl App for UploaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
