//! TrackerPipeline for combining detection with tracking.

use crate::session::Session;
use crate::tracker::{ConfigError, SortTracker, TrackerConfig, TrackingBox};

use super::DetectionSource;

/// Bundles a detection source with its own tracking session.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    session: Session,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given detector and tracker config.
    pub fn new(detector: D, config: TrackerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detector,
            session: Session::new(config)?,
        })
    }

    /// Create a new tracking pipeline with default tracker configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self {
            detector,
            session: Session::with_tracker(Box::new(SortTracker::new(TrackerConfig::default()))),
        }
    }

    /// Detect and track one frame.
    ///
    /// Only detector failures are returned as errors; tracking itself
    /// never fails.
    pub fn process_frame(
        &mut self,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<TrackingBox>, D::Error> {
        let detections = self.detector.detect(frame, width, height)?;
        Ok(self.session.update(&detections))
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{DetectionBox, Rect};

    struct MockDetector {
        detections: Vec<DetectionBox>,
        fail: bool,
    }

    impl DetectionSource for MockDetector {
        type Error = String;

        fn detect(
            &mut self,
            _frame: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<DetectionBox>, Self::Error> {
            if self.fail {
                return Err("camera offline".to_string());
            }
            Ok(self.detections.clone())
        }
    }

    #[test]
    fn test_tracker_pipeline() {
        let detector = MockDetector {
            detections: vec![DetectionBox::new(Rect::new(10.0, 20.0, 40.0, 60.0), 0.9, 0)],
            fail: false,
        };

        let mut pipeline = TrackerPipeline::with_default_config(detector);
        let first = pipeline.process_frame(&[], 640, 480).unwrap();
        let second = pipeline.process_frame(&[], 640, 480).unwrap();

        // Reported during the startup grace period
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_detector_error_propagates() {
        let detector = MockDetector {
            detections: vec![],
            fail: true,
        };
        let mut pipeline = TrackerPipeline::new(detector, TrackerConfig::default()).unwrap();
        assert_eq!(
            pipeline.process_frame(&[], 640, 480),
            Err("camera offline".to_string())
        );

        pipeline.detector_mut().fail = false;
        assert!(pipeline.process_frame(&[], 640, 480).unwrap().is_empty());
    }
}
