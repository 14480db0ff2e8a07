use super::error::{PreviewError, TransportError};
use super::ingest::AdmittedFile;
use super::types::TaskId;
use crate::config::SimulationConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc::UnboundedSender;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

// deadline used when the configured completion time does not fit in an Instant
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

pub type DriverFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// What a driver reports about its transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Started,
    Progress(f32),
    Completed,
    Failed(TransportError),
}

/// Everything that flows into the queue manager's single mutation point.
#[derive(Debug)]
pub(crate) enum QueueEvent {
    Transport { id: TaskId, event: TransportEvent },
    Preview { id: TaskId, result: Result<String, PreviewError> },
    DriverExited { id: TaskId },
}

#[derive(Debug, Clone)]
pub struct UploadJob {
    pub id: TaskId,
    pub file: AdmittedFile,
    /// Position among the files admitted by the same selection.
    pub batch_index: usize,
}

/// A driver's only way to affect its task. Sends never fail loudly: if the
/// manager is gone, so is the task.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    id: TaskId,
    events: UnboundedSender<QueueEvent>,
}

impl ProgressSink {
    pub(crate) fn new(id: TaskId, events: UnboundedSender<QueueEvent>) -> Self {
        Self { id, events }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn started(&self) {
        self.send(TransportEvent::Started);
    }

    pub fn progress(&self, value: f32) {
        self.send(TransportEvent::Progress(value));
    }

    pub fn completed(&self) {
        self.send(TransportEvent::Completed);
    }

    pub fn failed(&self, error: TransportError) {
        self.send(TransportEvent::Failed(error));
    }

    fn send(&self, event: TransportEvent) {
        self.events
            .send(QueueEvent::Transport { id: self.id, event })
            .unwrap_or_default();
    }
}

/// Moves the bytes of one file somewhere and narrates it through the sink.
/// The returned future is spawned and aborted by the queue manager.
pub trait Transport: Send + Sync {
    fn upload(&self, job: UploadJob, sink: ProgressSink) -> DriverFuture;
}

/// Timer-driven stand-in for a network transfer: random progress steps
/// every tick, completion forced at a staggered deadline.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    settings: SimulationConfig,
}

impl SimulatedTransport {
    pub fn new(settings: SimulationConfig) -> Self {
        Self { settings }
    }
}

impl Transport for SimulatedTransport {
    fn upload(&self, job: UploadJob, sink: ProgressSink) -> DriverFuture {
        let settings = self.settings.clone();

        Box::pin(async move {
            let mut rng = StdRng::from_entropy();
            let now = Instant::now();
            let deadline = now
                .checked_add(settings.completion_after(job.batch_index))
                .unwrap_or(now + FAR_FUTURE);
            let max_step = settings.tick_step();
            let failure_rate = settings.failure_chance();

            let mut ticks = time::interval(settings.tick_interval());
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick is immediate
            ticks.tick().await;
            sink.started();

            let mut progress = 0.0f32;
            loop {
                tokio::select! {
                    _ = time::sleep_until(deadline) => {
                        sink.completed();
                        return;
                    }
                    _ = ticks.tick() => {
                        if failure_rate > 0.0 && rng.gen_bool(failure_rate) {
                            sink.failed(TransportError::Failed(
                                "simulated network error".to_string(),
                            ));
                            return;
                        }
                        progress += rng.gen_range(0.0..max_step);
                        sink.progress(progress);
                        if progress >= 100.0 {
                            return;
                        }
                    }
                }
            }
        })
    }
}
