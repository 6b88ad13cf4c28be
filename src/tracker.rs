mod error;
mod hungarian;
mod kalman_box_tracker;
mod kalman_filter;
mod matching;
mod rect;
mod sort_tracker;

pub use error::{ConfigError, FilterError, SolverError};
pub use hungarian::{AssignmentSolver, HungarianSolver, LapjvSolver};
pub use kalman_box_tracker::KalmanBoxTracker;
pub use kalman_filter::KalmanFilter;
pub use matching::{AssociationResult, DetectionBox, associate, iou_distance};
pub use rect::{Rect, iou_batch};
pub use sort_tracker::{MultiObjectTracker, SortTracker, TrackerConfig, TrackingBox};
