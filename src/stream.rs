//! Droppable frame admission
//!
//! A single worker task owns the processing stage and handles one frame at a
//! time. A frame offered while another is still in flight is discarded and
//! counted, never queued, so memory and latency stay bounded under overload.
//!
//! Must be started from within a tokio runtime.

use crate::error::MotionError;
use crate::pipeline::{FrameOutcome, PoseProcessor};
use crate::schema::FrameRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// One stage of frame processing driven by the stream worker
#[async_trait]
pub trait FrameStage: Send + 'static {
    type Output: Send + 'static;

    /// Process a single record
    async fn process(&mut self, record: FrameRecord) -> Result<Self::Output, MotionError>;

    /// Once fatal, the worker stops pulling frames
    fn is_fatal(&self) -> bool;

    /// Frames discarded at admission since the last call
    fn record_dropped(&mut self, _count: u64) {}
}

#[async_trait]
impl FrameStage for PoseProcessor {
    type Output = FrameOutcome;

    async fn process(&mut self, record: FrameRecord) -> Result<FrameOutcome, MotionError> {
        self.process_record(&record)
    }

    fn is_fatal(&self) -> bool {
        PoseProcessor::is_fatal(self)
    }

    fn record_dropped(&mut self, count: u64) {
        PoseProcessor::record_dropped(self, count);
    }
}

/// Result of offering a record to the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    /// Another frame was in flight
    Dropped,
    /// The worker has stopped
    Closed,
}

/// Emitted by the worker after each admitted frame
#[derive(Debug, Clone)]
pub enum StreamEvent<O> {
    Frame(O),
    Failed(String),
    Fatal { consecutive_errors: u32 },
}

/// Point-in-time admission counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    pub offered: u64,
    pub admitted: u64,
    pub dropped: u64,
    pub completed: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    offered: AtomicU64,
    admitted: AtomicU64,
    dropped: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> StreamStats {
        StreamStats {
            offered: self.offered.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// State shared between the handle and the worker
#[derive(Debug, Default)]
struct Shared {
    in_flight: AtomicBool,
    closed: AtomicBool,
    /// Drops already reported to the stage
    forwarded: AtomicU64,
    counters: Counters,
}

/// Everything left once the stream has been shut down
pub struct StreamSummary<S: FrameStage> {
    pub stage: S,
    pub stats: StreamStats,
    /// Events that were not consumed before shutdown
    pub pending_events: Vec<StreamEvent<S::Output>>,
}

/// Producer-side handle of a running stream
pub struct StreamHandle<S: FrameStage> {
    records: mpsc::Sender<FrameRecord>,
    events: mpsc::Receiver<StreamEvent<S::Output>>,
    shared: Arc<Shared>,
    worker: JoinHandle<S>,
}

/// Start a worker task that owns `stage`
pub fn spawn<S: FrameStage>(stage: S, event_capacity: usize) -> StreamHandle<S> {
    let (record_tx, record_rx) = mpsc::channel(1);
    let (event_tx, event_rx) = mpsc::channel(event_capacity.max(1));
    let shared = Arc::new(Shared::default());

    let worker = tokio::spawn(run_worker(stage, record_rx, event_tx, Arc::clone(&shared)));

    StreamHandle {
        records: record_tx,
        events: event_rx,
        shared,
        worker,
    }
}

impl<S: FrameStage> StreamHandle<S> {
    /// Offer a record without waiting
    pub fn offer(&self, record: FrameRecord) -> Admission {
        let counters = &self.shared.counters;
        counters.offered.fetch_add(1, Ordering::Relaxed);

        if self.shared.closed.load(Ordering::Acquire) {
            return Admission::Closed;
        }

        if self
            .shared
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            counters.dropped.fetch_add(1, Ordering::Relaxed);
            return Admission::Dropped;
        }

        match self.records.try_send(record) {
            Ok(()) => {
                counters.admitted.fetch_add(1, Ordering::Relaxed);
                Admission::Accepted
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.shared.in_flight.store(false, Ordering::Release);
                counters.dropped.fetch_add(1, Ordering::Relaxed);
                Admission::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.shared.in_flight.store(false, Ordering::Release);
                Admission::Closed
            }
        }
    }

    /// Next event from the worker; `None` once the worker has exited
    pub async fn next_event(&mut self) -> Option<StreamEvent<S::Output>> {
        self.events.recv().await
    }

    /// Non-blocking variant of [`next_event`](Self::next_event)
    pub fn try_next_event(&mut self) -> Option<StreamEvent<S::Output>> {
        self.events.try_recv().ok()
    }

    pub fn stats(&self) -> StreamStats {
        self.shared.counters.snapshot()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Stop accepting records, let the in-flight frame finish and hand the
    /// stage back
    pub async fn finish(self) -> Result<StreamSummary<S>, MotionError> {
        let StreamHandle {
            records,
            mut events,
            shared,
            worker,
        } = self;
        drop(records);

        let mut pending_events = Vec::new();
        while let Some(event) = events.recv().await {
            pending_events.push(event);
        }

        let mut stage = worker
            .await
            .map_err(|e| MotionError::Stream(e.to_string()))?;

        let stats = shared.counters.snapshot();
        forward_drops(&mut stage, &shared);
        debug!(?stats, "Frame stream finished");

        Ok(StreamSummary {
            stage,
            stats,
            pending_events,
        })
    }
}

/// Hand drops not yet reported to the stage
fn forward_drops<S: FrameStage>(stage: &mut S, shared: &Shared) {
    let dropped = shared.counters.dropped.load(Ordering::Relaxed);
    let previous = shared.forwarded.swap(dropped, Ordering::AcqRel);
    if dropped > previous {
        stage.record_dropped(dropped - previous);
    }
}

async fn run_worker<S: FrameStage>(
    mut stage: S,
    mut records: mpsc::Receiver<FrameRecord>,
    events: mpsc::Sender<StreamEvent<S::Output>>,
    shared: Arc<Shared>,
) -> S {
    while let Some(record) = records.recv().await {
        forward_drops(&mut stage, &shared);

        let event = match stage.process(record).await {
            Ok(output) => {
                shared.counters.completed.fetch_add(1, Ordering::Relaxed);
                StreamEvent::Frame(output)
            }
            Err(MotionError::SessionFatal { consecutive_errors }) => {
                shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                StreamEvent::Fatal { consecutive_errors }
            }
            Err(e) => {
                shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Frame processing failed");
                StreamEvent::Failed(e.to_string())
            }
        };

        let fatal = matches!(event, StreamEvent::Fatal { .. }) || stage.is_fatal();
        if fatal {
            shared.closed.store(true, Ordering::Release);
        }

        // A slow consumer holds the slot, so further offers are dropped
        if events.send(event).await.is_err() {
            debug!("Event receiver dropped; discarding frame output");
        }
        shared.in_flight.store(false, Ordering::Release);

        if fatal {
            error!("Frame stream halted after fatal session error");
            break;
        }
    }

    forward_drops(&mut stage, &shared);
    stage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::types::fixtures::standing_landmarks;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn record(index: u64) -> FrameRecord {
        FrameRecord::new(
            index,
            index as i64 * 33_333,
            (1000, 1000),
            standing_landmarks(0.95),
        )
    }

    fn broken_record(index: u64) -> FrameRecord {
        FrameRecord::new(index, index as i64 * 33_333, (0, 0), standing_landmarks(0.95))
    }

    /// Processor behind an artificial delay
    struct DelayedStage {
        inner: PoseProcessor,
        delay: Duration,
    }

    #[async_trait]
    impl FrameStage for DelayedStage {
        type Output = FrameOutcome;

        async fn process(&mut self, record: FrameRecord) -> Result<FrameOutcome, MotionError> {
            tokio::time::sleep(self.delay).await;
            self.inner.process_record(&record)
        }

        fn is_fatal(&self) -> bool {
            self.inner.is_fatal()
        }

        fn record_dropped(&mut self, count: u64) {
            self.inner.record_dropped(count);
        }
    }

    #[tokio::test]
    async fn test_sequential_frames_are_processed() {
        let processor = PoseProcessor::new(PipelineConfig::default()).unwrap();
        let mut handle = spawn(processor, 4);

        for index in 0..3 {
            assert_eq!(handle.offer(record(index)), Admission::Accepted);
            match handle.next_event().await {
                Some(StreamEvent::Frame(outcome)) => {
                    assert_eq!(outcome.frame_index, index);
                    assert!(outcome.is_valid());
                }
                other => panic!("unexpected event: {:?}", other),
            }
            // The worker clears the slot right after emitting
            tokio::task::yield_now().await;
        }

        let summary = handle.finish().await.unwrap();
        assert_eq!(summary.stats.completed, 3);
        assert_eq!(summary.stats.dropped, 0);
        assert_eq!(summary.stage.metrics().frames_processed, 3);
    }

    #[tokio::test]
    async fn test_overload_drops_instead_of_queueing() {
        let stage = DelayedStage {
            inner: PoseProcessor::new(PipelineConfig::default()).unwrap(),
            delay: Duration::from_millis(20),
        };
        let handle = spawn(stage, 64);

        let offered = 100u64;
        for index in 0..offered {
            handle.offer(record(index));
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let summary = handle.finish().await.unwrap();
        let stats = summary.stats;
        assert_eq!(stats.offered, offered);
        assert!(stats.dropped > 0);
        assert_eq!(stats.admitted + stats.dropped, offered);
        assert!(stats.completed < offered / 2);
        assert_eq!(stats.completed, stats.admitted);

        let metrics = summary.stage.inner.metrics();
        assert_eq!(metrics.frames_dropped, stats.dropped);
        assert_eq!(metrics.frames_processed, stats.completed);
        assert_eq!(summary.pending_events.len() as u64, stats.completed);
    }

    #[tokio::test]
    async fn test_worker_stops_when_fatal() {
        let processor = PoseProcessor::new(PipelineConfig::default()).unwrap();
        let max_errors = processor.config().failure.max_consecutive_errors;
        let mut handle = spawn(processor, 16);

        let mut failed = 0;
        let mut fatal = None;
        for index in 0..u64::from(max_errors) {
            assert_eq!(handle.offer(broken_record(index)), Admission::Accepted);
            match handle.next_event().await {
                Some(StreamEvent::Failed(_)) => failed += 1,
                Some(StreamEvent::Fatal { consecutive_errors }) => fatal = Some(consecutive_errors),
                _ => panic!("expected a failure event"),
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(failed, max_errors - 1);
        assert_eq!(fatal, Some(max_errors));
        assert!(handle.is_closed());
        assert_eq!(handle.offer(record(99)), Admission::Closed);

        let summary = handle.finish().await.unwrap();
        assert!(summary.stage.is_fatal());
        assert_eq!(summary.stats.failed, u64::from(max_errors));
    }
}
