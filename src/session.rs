//! Owned tracking sessions, one per video stream.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::tracker::{
    ConfigError, DetectionBox, MultiObjectTracker, SortTracker, TrackerConfig, TrackingBox,
};

/// Sessions currently alive in this process. Diagnostics only.
static LIVE_SESSIONS: AtomicUsize = AtomicUsize::new(0);

/// Number of sessions currently alive in this process.
pub fn live_sessions() -> usize {
    LIVE_SESSIONS.load(Ordering::Relaxed)
}

/// A tracker instance bound to one stream.
///
/// Each session owns its tracks exclusively, so independent sessions can run
/// on separate threads. Dropping the session releases it.
pub struct Session {
    tracker: Box<dyn MultiObjectTracker + Send>,
}

impl Session {
    /// Start a SORT session with a validated configuration.
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_tracker(Box::new(SortTracker::new(config))))
    }

    /// Wrap any tracker implementation in a session.
    pub fn with_tracker(tracker: Box<dyn MultiObjectTracker + Send>) -> Self {
        let live = LIVE_SESSIONS.fetch_add(1, Ordering::Relaxed) + 1;
        info!(live_sessions = live, "tracking session created");
        Self { tracker }
    }

    /// Process one frame of detections.
    pub fn update(&mut self, detections: &[DetectionBox]) -> Vec<TrackingBox> {
        self.tracker.update(detections)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let live = LIVE_SESSIONS.fetch_sub(1, Ordering::Relaxed) - 1;
        info!(live_sessions = live, "tracking session released");
    }
}

/// Create a SORT session from raw, signed parameters.
pub fn create_session(
    max_age: i64,
    min_hits: i64,
    iou_threshold: f32,
) -> Result<Session, ConfigError> {
    Session::new(TrackerConfig::from_raw(max_age, min_hits, iou_threshold)?)
}

/// Release the session behind `handle` and clear the handle.
///
/// Releasing an empty handle does nothing.
pub fn release_session(handle: &mut Option<Session>) {
    drop(handle.take());
}

/// Process one frame on `handle`; a released handle reports nothing.
pub fn update_session(
    handle: &mut Option<Session>,
    detections: &[DetectionBox],
) -> Vec<TrackingBox> {
    match handle {
        Some(session) => session.update(detections),
        None => Vec::new(),
    }
}
