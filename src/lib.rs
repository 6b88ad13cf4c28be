//! SORT (Simple Online and Realtime Tracking) for per-frame detector output.
//!
//! Each frame's detections are matched to Kalman-predicted tracks with an
//! optimal IoU assignment; unmatched detections start new tracks and tracks
//! that stay unmatched for longer than `max_age` frames are dropped.
//!
//! ```
//! use sort_tracker::{DetectionBox, Rect, SortTracker, TrackerConfig};
//!
//! let mut tracker = SortTracker::new(TrackerConfig::default());
//! let detections = [DetectionBox::new(Rect::new(10.0, 20.0, 40.0, 60.0), 0.9, 0)];
//! let tracks = tracker.update(&detections);
//! assert_eq!(tracks.len(), 1);
//! ```

pub mod integration;
pub mod session;
pub mod tracker;

pub use integration::{DetectionSource, IntoDetections, TrackerPipeline};
pub use session::{Session, create_session, live_sessions, release_session, update_session};
pub use tracker::{
    AssignmentSolver, ConfigError, DetectionBox, HungarianSolver, LapjvSolver,
    MultiObjectTracker, Rect, SortTracker, TrackerConfig, TrackingBox,
};
