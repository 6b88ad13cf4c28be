use std::collections::HashSet;

use sort_tracker::{DetectionBox, Rect, SortTracker, TrackerConfig, TrackingBox};

fn det(x: f32, y: f32, w: f32, h: f32) -> DetectionBox {
    DetectionBox::new(Rect::new(x, y, w, h), 0.9, 0)
}

fn ids(tracks: &[TrackingBox]) -> Vec<u64> {
    tracks.iter().map(|t| t.id).collect()
}

#[test]
fn test_basic_tracking() {
    let mut tracker = SortTracker::new(TrackerConfig::default().with_max_age(2));

    // Frame 1: one detection, reported during the startup grace period
    let tracks1 = tracker.update(&[det(100.0, 100.0, 100.0, 100.0)]);
    assert_eq!(tracks1.len(), 1);
    let id1 = tracks1[0].id;
    assert!(id1 >= 1);

    // Frames 2-5: same object moving slightly keeps its id
    for step in 1..=4 {
        let offset = 5.0 * step as f32;
        let tracks = tracker.update(&[det(100.0 + offset, 100.0 + offset, 100.0, 100.0)]);
        assert_eq!(ids(&tracks), vec![id1]);
    }

    // Frame 6: object occluded, nothing reported but the track survives
    assert!(tracker.update(&[]).is_empty());
    assert_eq!(tracker.live_tracks(), 1);

    // Frame 7: object reappears where the motion model expects it
    let tracks7 = tracker.update(&[det(130.0, 130.0, 100.0, 100.0)]);
    assert_eq!(tracker.live_tracks(), 1);
    assert!(tracker.tracks().all(|t| t.id + 1 == id1));
    // streak was broken, so it is not reported again yet
    assert!(tracks7.is_empty());
}

#[test]
fn test_ids_unique_within_frame() {
    let mut tracker = SortTracker::new(TrackerConfig::default().with_min_hits(1));
    let frame: Vec<DetectionBox> = (0..20)
        .map(|i| det(50.0 * (i % 5) as f32 + 1.0, 50.0 * (i / 5) as f32 + 1.0, 30.0, 30.0))
        .collect();

    for _ in 0..5 {
        let tracks = tracker.update(&frame);
        assert_eq!(tracks.len(), 20);
        let unique: HashSet<u64> = tracks.iter().map(|t| t.id).collect();
        assert_eq!(unique.len(), tracks.len());
    }
}

#[test]
fn test_track_lifetime_matches_max_age() {
    let max_age = 4;
    let mut tracker = SortTracker::new(TrackerConfig::default().with_max_age(max_age));

    // created at frame f
    let first = tracker.update(&[det(200.0, 200.0, 50.0, 50.0)]);
    assert_eq!(first.len(), 1);

    // present through f + max_age, never reported again
    for _ in 0..max_age {
        assert!(tracker.update(&[]).is_empty());
        assert_eq!(tracker.live_tracks(), 1);
    }

    // gone at f + max_age + 1
    assert!(tracker.update(&[]).is_empty());
    assert_eq!(tracker.live_tracks(), 0);
}

#[test]
fn test_min_hits_one_reports_on_creation() {
    let mut tracker = SortTracker::new(TrackerConfig::default().with_min_hits(1));
    let tracks = tracker.update(&[det(10.0, 10.0, 20.0, 20.0)]);
    assert_eq!(tracks.len(), 1);
    assert!((tracks[0].bbox.x - 10.0).abs() < 1e-3);
    assert!((tracks[0].bbox.width - 20.0).abs() < 1e-3);
}

#[test]
fn test_weak_optimal_pair_is_rejected() {
    let mut tracker = SortTracker::new(TrackerConfig::default().with_max_age(3));

    let track_a = Rect::new(10.0, 10.0, 10.0, 10.0);
    let track_b = Rect::new(200.0, 10.0, 10.0, 10.0);
    let first = tracker.update(&[
        DetectionBox::new(track_a, 0.9, 0),
        DetectionBox::new(track_b, 0.9, 1),
    ]);
    let (id_a, id_b) = (first[0].id, first[1].id);

    // Overlaps of 0.9 with track A and 0.1 with track B, sliding along x.
    let overlap = |iou: f32| 20.0 * iou / (1.0 + iou);
    let det_a = Rect::new(track_a.x + 10.0 - overlap(0.9), 10.0, 10.0, 10.0);
    let det_b = Rect::new(track_b.x + 10.0 - overlap(0.1), 10.0, 10.0, 10.0);
    assert!((det_a.iou(&track_a) - 0.9).abs() < 1e-4);
    assert!((det_b.iou(&track_b) - 0.1).abs() < 1e-4);

    let second = tracker.update(&[
        DetectionBox::new(det_a, 0.9, 0),
        DetectionBox::new(det_b, 0.9, 1),
    ]);

    // Track A matched; detection B spawned a fresh track; track B missed.
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].id, id_a);
    assert!(second[1].id > id_b);
    assert_eq!(tracker.live_tracks(), 3);
    let missed = tracker.tracks().find(|t| t.id + 1 == id_b).unwrap();
    assert_eq!(missed.time_since_update, 1);
}

#[test]
fn test_edge_track_removed_before_association() {
    let config = TrackerConfig::default().with_max_age(10).with_min_hits(1);
    let mut tracker = SortTracker::new(config);

    // Object sliding towards the left edge at 4 px per frame.
    let mut reported = Vec::new();
    for step in 0..3 {
        reported.push(tracker.update(&[det(10.0 - 4.0 * step as f32, 40.0, 20.0, 20.0)]));
    }
    let original_id = reported[0][0].id;
    assert!(reported.iter().all(|frame| ids(frame) == vec![original_id]));

    // The next prediction has x < 0: the track is deleted before matching, so
    // the detection right at the edge cannot continue it.
    tracker.update(&[det(0.0, 40.0, 20.0, 20.0)]);
    assert_eq!(tracker.live_tracks(), 1);
    assert!(tracker.tracks().all(|t| t.id + 1 > original_id));
}

#[test]
fn test_ids_never_reused() {
    let config = TrackerConfig::default().with_max_age(0).with_min_hits(1);
    let mut tracker = SortTracker::new(config);

    let mut max_seen: Option<u64> = None;
    let mut live: HashSet<u64> = HashSet::new();
    for frame in 0..6 {
        // Alternate between two distant spots so every track dies quickly.
        let x = if frame % 2 == 0 { 10.0 } else { 300.0 };
        tracker.update(&[det(x, 10.0, 20.0, 20.0)]);

        let now: HashSet<u64> = tracker.tracks().map(|t| t.id).collect();
        for &id in now.difference(&live) {
            assert!(max_seen.is_none_or(|m| id > m), "id {id} reused");
        }
        max_seen = now.iter().copied().max().max(max_seen);
        live = now;
    }
    assert!(max_seen.is_some());
}

#[test]
fn test_two_moving_objects_keep_identity() {
    let mut tracker = SortTracker::new(TrackerConfig::default().with_min_hits(1));

    let mut first_ids = None;
    for step in 0..10 {
        let s = step as f32 * 3.0;
        let tracks = tracker.update(&[
            det(100.0 + s, 100.0, 30.0, 30.0),
            det(300.0 - s, 200.0, 30.0, 30.0),
        ]);
        assert_eq!(tracks.len(), 2);
        let frame_ids = ids(&tracks);
        match &first_ids {
            None => first_ids = Some(frame_ids),
            Some(expected) => assert_eq!(&frame_ids, expected),
        }
    }
}
