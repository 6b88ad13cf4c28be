//! Main SORT algorithm implementation.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::tracker::error::ConfigError;
use crate::tracker::hungarian::{AssignmentSolver, HungarianSolver};
use crate::tracker::kalman_box_tracker::KalmanBoxTracker;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{self, AssociationResult, DetectionBox};
use crate::tracker::rect::Rect;

/// Configuration for the SortTracker, fixed for the tracker's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Frames a track may go unmatched before it is deleted
    pub max_age: u32,
    /// Consecutive matches needed before a track is reported
    pub min_hits: u32,
    /// Minimum overlap for a detection to be accepted by a track
    pub iou_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 1,
            min_hits: 3,
            iou_threshold: 0.3,
        }
    }
}

impl TrackerConfig {
    /// Validate externally supplied, signed parameters.
    pub fn from_raw(max_age: i64, min_hits: i64, iou_threshold: f32) -> Result<Self, ConfigError> {
        if max_age < 0 {
            return Err(ConfigError::NegativeMaxAge(max_age));
        }
        if min_hits < 0 {
            return Err(ConfigError::NegativeMinHits(min_hits));
        }
        let max_age = u32::try_from(max_age).map_err(|_| ConfigError::OutOfRange {
            field: "max_age",
            value: max_age,
        })?;
        let min_hits = u32::try_from(min_hits).map_err(|_| ConfigError::OutOfRange {
            field: "min_hits",
            value: min_hits,
        })?;
        let config = Self {
            max_age,
            min_hits,
            iou_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_age(mut self, max_age: u32) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_min_hits(mut self, min_hits: u32) -> Self {
        self.min_hits = min_hits;
        self
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f32) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.iou_threshold.is_finite() || !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(ConfigError::InvalidIouThreshold(self.iou_threshold));
        }
        Ok(())
    }
}

/// A reported track for one frame. Ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingBox {
    pub id: u64,
    pub bbox: Rect,
}

/// Anything that turns one frame of detections into reported tracks.
pub trait MultiObjectTracker {
    fn update(&mut self, detections: &[DetectionBox]) -> Vec<TrackingBox>;
}

pub struct SortTracker {
    tracks: BTreeMap<u64, KalmanBoxTracker>,
    frame_count: u64,
    config: TrackerConfig,
    kalman_filter: KalmanFilter,
    solver: Box<dyn AssignmentSolver>,
}

impl SortTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_solver(config, Box::new(HungarianSolver))
    }

    pub fn with_solver(config: TrackerConfig, solver: Box<dyn AssignmentSolver>) -> Self {
        Self {
            tracks: BTreeMap::new(),
            frame_count: 0,
            config,
            kalman_filter: KalmanFilter::default(),
            solver,
        }
    }

    pub fn with_kalman_filter(mut self, kalman_filter: KalmanFilter) -> Self {
        self.kalman_filter = kalman_filter;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Number of live tracks, reported or not.
    pub fn live_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Live tracks in creation order.
    pub fn tracks(&self) -> impl Iterator<Item = &KalmanBoxTracker> {
        self.tracks.values()
    }

    pub fn update(&mut self, detections: &[DetectionBox]) -> Vec<TrackingBox> {
        self.frame_count += 1;

        // Step 1: Predict, dropping tracks that drift past the top/left edge
        let mut predicted: Vec<(u64, Rect)> = Vec::with_capacity(self.tracks.len());
        let mut off_frame = Vec::new();
        for (&id, track) in self.tracks.iter_mut() {
            let bbox = track.predict(&self.kalman_filter);
            if bbox.has_negative_origin() {
                off_frame.push(id);
            } else {
                predicted.push((id, bbox));
            }
        }
        for id in off_frame {
            debug!(track_id = id, "removing track with negative predicted origin");
            self.tracks.remove(&id);
        }

        // Step 2: Associate detections with the surviving predictions
        let det_rects: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
        let track_rects: Vec<Rect> = predicted.iter().map(|&(_, bbox)| bbox).collect();
        let AssociationResult {
            matches,
            unmatched_detections,
            unmatched_tracks,
        } = matching::associate(
            &det_rects,
            &track_rects,
            self.config.iou_threshold,
            self.solver.as_ref(),
        );

        // Step 3: Correct matched tracks
        for &(idet, itrack) in &matches {
            let track = predicted
                .get(itrack)
                .and_then(|(id, _)| self.tracks.get_mut(id));
            match (track, detections.get(idet)) {
                (Some(track), Some(det)) => track.update(det.bbox, &self.kalman_filter),
                _ => warn!(idet, itrack, "match index out of bounds, skipping"),
            }
        }

        // Step 4: Start tentative tracks for unmatched detections
        for &idet in &unmatched_detections {
            let Some(det) = detections.get(idet) else {
                warn!(idet, "unmatched detection index out of bounds, skipping");
                continue;
            };
            let track = KalmanBoxTracker::new(det.bbox, &self.kalman_filter);
            debug!(track_id = track.id, class_id = det.class_id, "new track");
            self.tracks.insert(track.id, track);
        }

        // Step 5: Report tracks matched this frame with enough evidence
        let in_grace_period = self.frame_count <= u64::from(self.config.min_hits);
        let output: Vec<TrackingBox> = self
            .tracks
            .values()
            .filter(|t| {
                t.time_since_update < 1 && (t.hit_streak >= self.config.min_hits || in_grace_period)
            })
            .map(|t| TrackingBox {
                id: t.id + 1,
                bbox: t.state(),
            })
            .collect();

        // Step 6: Drop tracks unmatched for too long
        let max_age = self.config.max_age;
        self.tracks.retain(|&id, t| {
            let alive = t.time_since_update <= max_age;
            if !alive {
                debug!(track_id = id, age = t.age, "track expired");
            }
            alive
        });

        trace!(
            frame = self.frame_count,
            detections = detections.len(),
            matched = matches.len(),
            unmatched_tracks = unmatched_tracks.len(),
            live = self.tracks.len(),
            reported = output.len(),
            "frame processed"
        );

        output
    }
}

impl MultiObjectTracker for SortTracker {
    fn update(&mut self, detections: &[DetectionBox]) -> Vec<TrackingBox> {
        SortTracker::update(self, detections)
    }
}
