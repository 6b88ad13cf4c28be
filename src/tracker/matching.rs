//! Detection-to-track association.

use ndarray::Array2;
use tracing::warn;

use crate::tracker::hungarian::AssignmentSolver;
use crate::tracker::rect::{Rect, iou_batch};

/// Detection input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionBox {
    /// Bounding box in TLWH format
    pub bbox: Rect,
    /// Detection confidence score
    pub confidence: f32,
    /// Detector class label
    pub class_id: i32,
}

impl DetectionBox {
    pub fn new(bbox: Rect, confidence: f32, class_id: i32) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
        }
    }

    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: i32) -> Self {
        Self::new(Rect::from_tlbr(x1, y1, x2, y2), confidence, class_id)
    }

    /// Build from a center point and size, as many detector heads emit.
    pub fn from_xywh_center(
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        confidence: f32,
        class_id: i32,
    ) -> Self {
        Self::new(Rect::new(cx - w / 2.0, cy - h / 2.0, w, h), confidence, class_id)
    }
}

/// Outcome of one frame's association step. Pairs are `(detection, track)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_detections: Vec<usize>,
    pub unmatched_tracks: Vec<usize>,
}

impl AssociationResult {
    fn all_unmatched(num_dets: usize, num_tracks: usize) -> Self {
        Self {
            matches: vec![],
            unmatched_detections: (0..num_dets).collect(),
            unmatched_tracks: (0..num_tracks).collect(),
        }
    }
}

/// Compute the IoU distance matrix, rows = detections, columns = tracks.
pub fn iou_distance(det_boxes: &[Rect], track_boxes: &[Rect]) -> Array2<f64> {
    iou_batch(det_boxes, track_boxes).mapv(|iou| 1.0 - iou as f64)
}

/// Match detections against predicted track boxes.
///
/// The solver's pairing is only accepted where the overlap reaches
/// `iou_threshold`; everything else falls back to the unmatched sets.
pub fn associate(
    det_boxes: &[Rect],
    track_boxes: &[Rect],
    iou_threshold: f32,
    solver: &dyn AssignmentSolver,
) -> AssociationResult {
    let num_dets = det_boxes.len();
    let num_tracks = track_boxes.len();

    if num_dets == 0 || num_tracks == 0 {
        return AssociationResult::all_unmatched(num_dets, num_tracks);
    }

    let cost_matrix = iou_distance(det_boxes, track_boxes);
    let assignment = match solver.solve(&cost_matrix) {
        Ok(assignment) => assignment,
        Err(err) => {
            warn!(%err, num_dets, num_tracks, "assignment failed, leaving frame unmatched");
            return AssociationResult::all_unmatched(num_dets, num_tracks);
        }
    };

    let mut matches = vec![];
    let mut unmatched_detections = vec![];
    let mut track_matched = vec![false; num_tracks];

    for idet in 0..num_dets {
        match assignment.get(idet).copied().flatten() {
            Some(itrack) if itrack >= num_tracks => {
                warn!(idet, itrack, num_tracks, "assignment index out of bounds, skipping");
                unmatched_detections.push(idet);
            }
            Some(itrack) if det_boxes[idet].iou(&track_boxes[itrack]) >= iou_threshold => {
                matches.push((idet, itrack));
                track_matched[itrack] = true;
            }
            _ => unmatched_detections.push(idet),
        }
    }

    let unmatched_tracks = track_matched
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| if m { None } else { Some(i) })
        .collect();

    AssociationResult {
        matches,
        unmatched_detections,
        unmatched_tracks,
    }
}
