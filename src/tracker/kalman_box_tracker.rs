//! Single tracked object: a Kalman state plus lifecycle counters.

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::{Array1, Array2};
use tracing::warn;

use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::rect::Rect;

/// Process-wide track id counter. Ids are never handed out twice.
static TRACK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_track_id() -> u64 {
    TRACK_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Per-track state estimator.
#[derive(Debug, Clone)]
pub struct KalmanBoxTracker {
    /// Internal track identifier, assigned once at birth
    pub id: u64,
    /// Consecutive frames matched since the last miss
    pub hit_streak: u32,
    /// Frames since the last successful match
    pub time_since_update: u32,
    /// Frames since creation
    pub age: u32,
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

impl KalmanBoxTracker {
    /// Start a new track from its first detection.
    pub fn new(bbox: Rect, kalman_filter: &KalmanFilter) -> Self {
        let (mean, covariance) = kalman_filter.initiate(bbox.to_xysr());
        Self {
            id: next_track_id(),
            hit_streak: 0,
            time_since_update: 0,
            age: 0,
            mean,
            covariance,
        }
    }

    /// Advance the state one frame and return the predicted box.
    pub fn predict(&mut self, kalman_filter: &KalmanFilter) -> Rect {
        // keep the area positive
        if self.mean[2] + self.mean[6] <= 0.0 {
            self.mean[6] = 0.0;
        }
        let (mean, covariance) = kalman_filter.predict(&self.mean, &self.covariance);
        self.mean = mean;
        self.covariance = covariance;

        self.age += 1;
        if self.time_since_update > 0 {
            self.hit_streak = 0;
        }
        self.time_since_update += 1;

        self.state()
    }

    /// Correct the state with a matched detection box.
    pub fn update(&mut self, bbox: Rect, kalman_filter: &KalmanFilter) {
        self.time_since_update = 0;
        self.hit_streak += 1;

        match kalman_filter.update(&self.mean, &self.covariance, bbox.to_xysr()) {
            Ok((mean, covariance)) => {
                self.mean = mean;
                self.covariance = covariance;
            }
            Err(err) => {
                warn!(track_id = self.id, %err, "skipping correction, keeping prediction");
            }
        }
    }

    /// Current estimate as a box.
    pub fn state(&self) -> Rect {
        Rect::from_xysr(self.mean[0], self.mean[1], self.mean[2], self.mean[3])
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }
}
