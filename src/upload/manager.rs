use super::error::{SubmitError, TransportError};
use super::ingest::{AdmittedFile, FileIngestor, FileSelection};
use super::preview::PreviewGenerator;
use super::stats::{aggregate, QueueStats};
use super::task::UploadTask;
use super::transport::{
    ProgressSink, QueueEvent, SimulatedTransport, Transport, TransportEvent, UploadJob,
};
use super::types::{
    BatchSummary, Notification, TaskId, TaskView, UploadSettings, UploadStatus,
};
use crate::config::UploaderConfig;
use derivative::Derivative;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Background work attached to one task.
#[derive(Debug, Default)]
struct Workers {
    driver: Option<JoinHandle<()>>,
    preview: Option<JoinHandle<()>>,
}

/// Sends `DriverExited` when dropped, on normal return and on unwind alike.
/// Aborts only happen on evicted ids, which `apply` ignores.
struct ExitNotice {
    id: TaskId,
    events: UnboundedSender<QueueEvent>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        self.events
            .send(QueueEvent::DriverExited { id: self.id })
            .unwrap_or_default();
    }
}

impl Workers {
    fn abort(self) {
        if let Some(driver) = self.driver {
            driver.abort();
        }
        if let Some(preview) = self.preview {
            preview.abort();
        }
    }
}

/// Owns the upload queue and is the only thing that ever writes to it.
///
/// Drivers and preview reads run on the tokio runtime and report back
/// through a channel; their events are applied in `process_pending` or
/// `next_event`, each after checking that the task is still queued. Once
/// `remove` returns, nothing can touch that id again.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct UploadQueueManager {
    ingestor: FileIngestor,
    previews: PreviewGenerator,
    #[derivative(Debug = "ignore")]
    transport: Arc<dyn Transport>,
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    tasks: Vec<UploadTask>,
    workers: HashMap<TaskId, Workers>,
    next_id: u64,
    #[derivative(Debug = "ignore")]
    events_tx: UnboundedSender<QueueEvent>,
    #[derivative(Debug = "ignore")]
    events_rx: UnboundedReceiver<QueueEvent>,
    notifications: Vec<Notification>,
    settings: UploadSettings,
}

impl UploadQueueManager {
    pub fn new(config: &UploaderConfig, transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            ingestor: FileIngestor::new(config.max_file_size),
            previews: PreviewGenerator::new(config.preview_max_bytes),
            transport,
            runtime,
            tasks: Vec::new(),
            workers: HashMap::new(),
            next_id: 1,
            events_tx,
            events_rx,
            notifications: Vec::new(),
            settings: UploadSettings::default(),
        }
    }

    pub fn with_simulated_transport(config: &UploaderConfig, runtime: Handle) -> Self {
        let transport = Arc::new(SimulatedTransport::new(config.simulation.clone()));
        Self::new(config, transport, runtime)
    }

    pub fn max_file_size(&self) -> u64 {
        self.ingestor.max_size()
    }

    /// Validates the selection and queues every admitted file, in selection
    /// order. Rejected files only produce a notification.
    pub fn enqueue(&mut self, selection: FileSelection) -> Vec<TaskId> {
        let FileSelection { origin, files } = selection;
        let mut admitted = Vec::with_capacity(files.len());

        for result in self.ingestor.admit(files) {
            match result {
                Ok(file) => admitted.push(file),
                Err(error) => {
                    warn!("Rejected {}: {}", error.file_name(), error);
                    self.notifications.push(Notification::Rejected {
                        name: error.file_name().to_string(),
                        error,
                    });
                }
            }
        }

        let mut ids = Vec::with_capacity(admitted.len());
        for (batch_index, file) in admitted.into_iter().enumerate() {
            let id = self.allocate_id();
            self.tasks.push(UploadTask::new(id, file.clone()));

            let preview = self.spawn_preview(id, &file);
            let driver = self.spawn_driver(UploadJob {
                id,
                file,
                batch_index,
            });
            self.workers.insert(
                id,
                Workers {
                    driver: Some(driver),
                    preview,
                },
            );
            ids.push(id);
        }

        if !ids.is_empty() {
            info!("Queued {} file(s) from {:?}", ids.len(), origin);
            self.notifications
                .push(Notification::Queued { count: ids.len() });
        }
        ids
    }

    /// Stops the task's background work and evicts it. Returns the final
    /// view, `Cancelled` unless the task had already finished. Removing an
    /// unknown id does nothing.
    pub fn remove(&mut self, id: TaskId) -> Option<TaskView> {
        let index = self.position(id)?;

        if let Some(workers) = self.workers.remove(&id) {
            workers.abort();
        }
        let mut task = self.tasks.remove(index);
        task.cancel();

        info!("Removed {} ({})", task.file().name, id);
        self.notifications.push(Notification::Removed {
            id,
            name: task.file().name.clone(),
        });
        Some(task.view())
    }

    pub fn clear(&mut self) {
        let ids: Vec<TaskId> = self.tasks.iter().map(UploadTask::id).collect();
        for id in ids {
            self.remove(id);
        }
    }

    pub fn snapshot(&self) -> Vec<TaskView> {
        self.tasks.iter().map(UploadTask::view).collect()
    }

    pub fn get(&self, id: TaskId) -> Option<TaskView> {
        self.position(id).map(|index| self.tasks[index].view())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Every task completed, and there is at least one.
    pub fn is_batch_ready(&self) -> bool {
        !self.tasks.is_empty()
            && self
                .tasks
                .iter()
                .all(|task| task.status() == UploadStatus::Completed)
    }

    pub fn stats(&self) -> QueueStats {
        aggregate(&self.snapshot())
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut UploadSettings {
        &mut self.settings
    }

    /// The "Complete Upload" action. Leaves the queue as it is.
    pub fn complete_batch(&mut self) -> Result<BatchSummary, SubmitError> {
        if self.tasks.is_empty() {
            return Err(SubmitError::EmptyQueue);
        }

        let pending = self
            .tasks
            .iter()
            .filter(|task| task.status() != UploadStatus::Completed)
            .count();
        if pending > 0 {
            return Err(SubmitError::NotReady { pending });
        }

        let files = self.snapshot();
        let total_bytes = aggregate(&files).total_bytes;
        info!("Batch of {} file(s) completed", files.len());
        self.notifications
            .push(Notification::BatchCompleted { count: files.len() });

        Ok(BatchSummary {
            files,
            total_bytes,
            settings: self.settings.clone(),
        })
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Applies every event already waiting, without blocking. Meant to be
    /// called once per frame.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next event and applies it.
    pub async fn next_event(&mut self) {
        // the manager holds a sender, so the channel never closes
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }

    /// Applies events until every task is terminal and no preview is
    /// outstanding.
    pub async fn run_until_settled(&mut self) {
        while !self.is_settled() {
            self.next_event().await;
        }
    }

    fn is_settled(&self) -> bool {
        self.tasks.iter().all(|task| task.status().is_terminal())
            && self.workers.values().all(|workers| workers.preview.is_none())
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    fn spawn_driver(&self, job: UploadJob) -> JoinHandle<()> {
        let id = job.id;
        let driver = self
            .transport
            .upload(job, ProgressSink::new(id, self.events_tx.clone()));
        let notice = ExitNotice {
            id,
            events: self.events_tx.clone(),
        };

        self.runtime.spawn(async move {
            let _notice = notice;
            driver.await;
        })
    }

    fn spawn_preview(&self, id: TaskId, file: &AdmittedFile) -> Option<JoinHandle<()>> {
        let pending = self.previews.generate(file)?;
        let events = self.events_tx.clone();

        Some(self.runtime.spawn(async move {
            let result = pending.await;
            events
                .send(QueueEvent::Preview { id, result })
                .unwrap_or_default();
        }))
    }

    fn apply(&mut self, event: QueueEvent) {
        let id = match &event {
            QueueEvent::Transport { id, .. }
            | QueueEvent::Preview { id, .. }
            | QueueEvent::DriverExited { id } => *id,
        };
        let Some(index) = self.position(id) else {
            debug!("Dropping event for evicted task {}", id);
            return;
        };

        match event {
            QueueEvent::Transport { event, .. } => self.apply_transport(index, event),
            QueueEvent::Preview { result, .. } => {
                if let Some(workers) = self.workers.get_mut(&id) {
                    workers.preview = None;
                }
                match result {
                    Ok(uri) => {
                        self.tasks[index].attach_preview(uri);
                    }
                    Err(e) => debug!("No preview for {}: {}", id, e),
                }
            }
            QueueEvent::DriverExited { id } => {
                if let Some(workers) = self.workers.get_mut(&id) {
                    workers.driver = None;
                }
                self.fail(index, TransportError::DriverExited);
            }
        }
    }

    fn apply_transport(&mut self, index: usize, event: TransportEvent) {
        let task = &mut self.tasks[index];
        match event {
            TransportEvent::Started => {
                if task.begin() {
                    debug!("Uploading {} ({})", task.file().name, task.id());
                }
            }
            TransportEvent::Progress(value) => {
                if task.advance(value) {
                    trace!("{} at {:.1}%", task.id(), task.progress());
                    if task.status() == UploadStatus::Completed {
                        info!("Completed {} ({})", task.file().name, task.id());
                    }
                }
            }
            TransportEvent::Completed => {
                if task.complete() {
                    info!("Completed {} ({})", task.file().name, task.id());
                }
            }
            TransportEvent::Failed(error) => self.fail(index, error),
        }
    }

    fn fail(&mut self, index: usize, error: TransportError) {
        let task = &mut self.tasks[index];
        if !task.fail(error.clone()) {
            return;
        }
        warn!("Upload of {} failed: {}", task.file().name, error);
        self.notifications.push(Notification::Failed {
            id: task.id(),
            name: task.file().name.clone(),
            error,
        });
    }
}

impl Drop for UploadQueueManager {
    fn drop(&mut self) {
        for (_, workers) in self.workers.drain() {
            workers.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::error::{PreviewError, ValidationError};
    use crate::upload::ingest::{CandidateFile, FileSource, SelectionOrigin};
    use crate::upload::transport::testing::ManualTransport;
    use crate::upload::transport::DriverFuture;
    use std::time::Duration;

    fn candidate(name: &str, size: u64, mime_type: &str) -> CandidateFile {
        CandidateFile {
            name: name.to_string(),
            size,
            mime_type: mime_type.to_string(),
            source: FileSource::Memory(b"tiny".to_vec().into()),
        }
    }

    fn picked(files: Vec<CandidateFile>) -> FileSelection {
        FileSelection::new(SelectionOrigin::Picker, files)
    }

    fn manager(transport: &ManualTransport) -> UploadQueueManager {
        let config = UploaderConfig {
            max_file_size: 20_000_000,
            ..UploaderConfig::default()
        };
        UploadQueueManager::new(&config, Arc::new(transport.clone()), Handle::current())
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_and_the_rest_completes() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);

        let ids = queue.enqueue(picked(vec![
            candidate("fileA.png", 5_000_000, "image/png"),
            candidate("fileB.txt", 25_000_000, "text/plain"),
        ]));
        assert_eq!(ids.len(), 1);
        let a = ids[0];

        let notifications = queue.drain_notifications();
        assert!(notifications.contains(&Notification::Rejected {
            name: "fileB.txt".to_string(),
            error: ValidationError::SizeExceeded {
                name: "fileB.txt".to_string(),
                size: 25_000_000,
                limit: 20_000_000,
            },
        }));
        assert!(notifications.contains(&Notification::Queued { count: 1 }));

        let snapshot = queue.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "fileA.png");
        assert_eq!(snapshot[0].status, UploadStatus::Queued);
        assert_eq!(snapshot[0].progress, 0.0);
        assert!(!queue.is_batch_ready());

        let sink = transport.sink(a);
        sink.started();
        queue.process_pending();
        assert_eq!(queue.get(a).unwrap().status, UploadStatus::Uploading);
        assert!(!queue.is_batch_ready());

        sink.progress(42.0);
        sink.progress(104.0);
        queue.process_pending();
        let done = queue.get(a).unwrap();
        assert_eq!(done.status, UploadStatus::Completed);
        assert_eq!(done.progress, 100.0);
        assert!(queue.is_batch_ready());

        let stats = queue.stats();
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.total_bytes, 5_000_000);
        assert_eq!(stats.completed_count, 1);
    }

    #[tokio::test]
    async fn snapshot_keeps_admission_order_whatever_finishes_first() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);

        let ids = queue.enqueue(picked(vec![
            candidate("A.txt", 10, "text/plain"),
            candidate("B.txt", 20, "text/plain"),
        ]));
        transport.sink(ids[1]).completed();
        queue.process_pending();

        let names: Vec<_> = queue.snapshot().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["A.txt", "B.txt"]);
        assert_eq!(queue.get(ids[0]).unwrap().status, UploadStatus::Queued);
        assert_eq!(queue.get(ids[1]).unwrap().status, UploadStatus::Completed);
    }

    #[tokio::test]
    async fn interleaved_ticks_stay_monotonic_per_task() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        let ids = queue.enqueue(picked(vec![
            candidate("a", 1, "text/plain"),
            candidate("b", 1, "text/plain"),
        ]));
        let (a, b) = (transport.sink(ids[0]), transport.sink(ids[1]));

        let mut seen = [0.0f32; 2];
        for (sink, value) in [
            (&b, 10.0),
            (&a, 30.0),
            (&a, 20.0),
            (&b, 5.0),
            (&b, 60.0),
            (&a, 31.0),
        ] {
            sink.progress(value);
            queue.process_pending();
            for (slot, id) in ids.iter().enumerate() {
                let progress = queue.get(*id).unwrap().progress;
                assert!(progress >= seen[slot]);
                seen[slot] = progress;
            }
        }
        assert_eq!(seen, [31.0, 60.0]);
    }

    #[tokio::test]
    async fn removed_ids_never_come_back() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        let ids = queue.enqueue(picked(vec![
            candidate("keep.txt", 1, "text/plain"),
            candidate("drop.png", 1, "image/png"),
        ]));
        let dropped = ids[1];
        let sink = transport.sink(dropped);
        sink.progress(50.0);
        queue.process_pending();

        let last = queue.remove(dropped).unwrap();
        assert_eq!(last.status, UploadStatus::Cancelled);
        assert_eq!(last.progress, 50.0);
        assert!(queue.get(dropped).is_none());

        // late driver ticks and preview results for the evicted id
        sink.progress(80.0);
        sink.completed();
        queue
            .events_tx
            .send(QueueEvent::Preview {
                id: dropped,
                result: Ok("data:image/png;base64,AA==".to_string()),
            })
            .unwrap();
        queue.process_pending();
        tokio::task::yield_now().await;
        queue.process_pending();

        let snapshot = queue.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.iter().all(|task| task.id != dropped));

        assert!(queue.remove(dropped).is_none());

        let next = queue.enqueue(picked(vec![candidate("again.png", 1, "image/png")]));
        assert!(next[0] > dropped);
    }

    #[tokio::test]
    async fn remove_reports_finished_tasks_as_they_were() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        let id = queue.enqueue(picked(vec![candidate("a", 1, "text/plain")]))[0];
        transport.sink(id).completed();
        queue.process_pending();

        let view = queue.remove(id).unwrap();
        assert_eq!(view.status, UploadStatus::Completed);
        assert!(queue.drain_notifications().contains(&Notification::Removed {
            id,
            name: "a".to_string(),
        }));
        assert!(!queue.is_batch_ready());
    }

    #[tokio::test]
    async fn image_previews_arrive_after_admission() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        let ids = queue.enqueue(picked(vec![
            candidate("pic.png", 4, "image/png"),
            candidate("doc.txt", 4, "text/plain"),
        ]));
        assert!(queue.get(ids[0]).unwrap().preview_uri.is_none());

        tokio::time::timeout(Duration::from_secs(5), queue.next_event())
            .await
            .unwrap();

        assert_eq!(
            queue.get(ids[0]).unwrap().preview_uri.as_deref(),
            Some("data:image/png;base64,dGlueQ==")
        );
        assert!(queue.get(ids[1]).unwrap().preview_uri.is_none());
        assert_eq!(queue.get(ids[0]).unwrap().status, UploadStatus::Queued);
    }

    #[tokio::test]
    async fn preview_failures_are_silent() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        let id = queue.enqueue(picked(vec![candidate("pic.png", 4, "image/png")]))[0];
        queue.drain_notifications();

        queue
            .events_tx
            .send(QueueEvent::Preview {
                id,
                result: Err(PreviewError::TooLarge { size: 4, limit: 1 }),
            })
            .unwrap();
        queue.process_pending();

        let view = queue.get(id).unwrap();
        assert!(view.preview_uri.is_none());
        assert_eq!(view.status, UploadStatus::Queued);
        assert!(queue.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn failed_task_blocks_the_batch_and_freezes() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        let ids = queue.enqueue(picked(vec![
            candidate("ok", 1, "text/plain"),
            candidate("bad", 1, "text/plain"),
        ]));
        queue.drain_notifications();

        transport.sink(ids[0]).completed();
        let bad = transport.sink(ids[1]);
        bad.progress(25.0);
        bad.failed(TransportError::Failed("connection reset".into()));
        bad.progress(90.0);
        bad.completed();
        queue.process_pending();

        let failed = queue.get(ids[1]).unwrap();
        assert_eq!(failed.status, UploadStatus::Errored);
        assert_eq!(failed.progress, 25.0);
        assert!(!queue.is_batch_ready());
        assert_eq!(
            queue.drain_notifications(),
            vec![Notification::Failed {
                id: ids[1],
                name: "bad".to_string(),
                error: TransportError::Failed("connection reset".into()),
            }]
        );
        assert_eq!(
            queue.complete_batch(),
            Err(SubmitError::NotReady { pending: 1 })
        );

        queue.remove(ids[1]);
        assert!(queue.is_batch_ready());
    }

    #[tokio::test]
    async fn driver_that_vanishes_errors_its_task() {
        let transport = ManualTransport::exiting();
        let mut queue = manager(&transport);
        let id = queue.enqueue(picked(vec![candidate("a", 1, "text/plain")]))[0];

        tokio::time::timeout(Duration::from_secs(5), queue.run_until_settled())
            .await
            .unwrap();

        let view = queue.get(id).unwrap();
        assert_eq!(view.status, UploadStatus::Errored);
        assert_eq!(view.error, Some(TransportError::DriverExited.to_string()));
    }

    struct PanickingTransport;

    impl Transport for PanickingTransport {
        fn upload(&self, _job: UploadJob, sink: ProgressSink) -> DriverFuture {
            Box::pin(async move {
                sink.started();
                sink.progress(30.0);
                tokio::task::yield_now().await;
                panic!("transport bug");
            })
        }
    }

    #[tokio::test]
    async fn driver_that_panics_errors_its_task() {
        let mut queue = UploadQueueManager::new(
            &UploaderConfig::default(),
            Arc::new(PanickingTransport),
            Handle::current(),
        );
        let id = queue.enqueue(picked(vec![candidate("a", 1, "text/plain")]))[0];
        queue.drain_notifications();

        tokio::time::timeout(Duration::from_secs(5), queue.run_until_settled())
            .await
            .unwrap();

        let view = queue.get(id).unwrap();
        assert_eq!(view.status, UploadStatus::Errored);
        assert_eq!(view.progress, 30.0);
        assert!(!queue.is_batch_ready());
        assert_eq!(
            queue.drain_notifications(),
            vec![Notification::Failed {
                id,
                name: "a".to_string(),
                error: TransportError::DriverExited,
            }]
        );
    }

    #[tokio::test]
    async fn batch_index_counts_admitted_files_only() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        let ids = queue.enqueue(picked(vec![
            candidate("a", 1, "text/plain"),
            candidate("huge", 30_000_000, "text/plain"),
            candidate("c", 1, "text/plain"),
        ]));
        assert_eq!(transport.batch_index(ids[0]), 0);
        assert_eq!(transport.batch_index(ids[1]), 1);
    }

    #[tokio::test]
    async fn completing_the_batch_needs_files_and_readiness() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        assert!(!queue.is_batch_ready());
        assert_eq!(queue.complete_batch(), Err(SubmitError::EmptyQueue));

        let ids = queue.enqueue(picked(vec![
            candidate("a", 3, "text/plain"),
            candidate("b", 4, "text/plain"),
        ]));
        queue.settings_mut().description = "quarterly report".to_string();
        transport.sink(ids[0]).completed();
        transport.sink(ids[1]).completed();
        queue.process_pending();
        queue.drain_notifications();

        let summary = queue.complete_batch().unwrap();
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.total_bytes, 7);
        assert_eq!(summary.settings.description, "quarterly report");
        assert!(summary.settings.private);
        assert_eq!(
            queue.drain_notifications(),
            vec![Notification::BatchCompleted { count: 2 }]
        );

        // a new file makes the batch not ready again
        queue.enqueue(picked(vec![candidate("c", 1, "text/plain")]));
        assert!(!queue.is_batch_ready());
    }

    #[tokio::test]
    async fn clear_empties_the_queue() {
        let transport = ManualTransport::default();
        let mut queue = manager(&transport);
        queue.enqueue(picked(vec![
            candidate("a", 1, "text/plain"),
            candidate("b", 1, "image/png"),
        ]));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.stats(), QueueStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_uploads_run_to_completion() {
        let config = UploaderConfig::default();
        let mut queue = UploadQueueManager::with_simulated_transport(&config, Handle::current());
        queue.enqueue(picked(vec![
            candidate("a.png", 10, "image/png"),
            candidate("b.txt", 20, "text/plain"),
            candidate("c.zip", 30, "application/zip"),
        ]));

        let mut last = vec![0.0f32; 3];
        while !queue.is_settled() {
            queue.next_event().await;
            for (slot, task) in queue.snapshot().iter().enumerate() {
                assert!(task.progress >= last[slot]);
                last[slot] = task.progress;
            }
        }

        assert!(queue.is_batch_ready());
        let stats = queue.stats();
        assert_eq!(stats.completed_count, 3);
        assert_eq!(stats.total_bytes, 60);
        assert!(queue.snapshot()[0].preview_uri.is_some());
    }
}
