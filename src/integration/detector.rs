//! Trait for object detection inference backends.

use crate::tracker::{DetectionBox, Rect};

/// Trait for object detection inference backends.
///
/// Implement this trait to feed any detection model into a tracking session.
///
/// # Example
///
/// ```ignore
/// use sort_tracker::{DetectionBox, DetectionSource};
///
/// struct FireSmokeDetector {
///     // model handle here
/// }
///
/// impl DetectionSource for FireSmokeDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &[u8], width: u32, height: u32) -> Result<Vec<DetectionBox>, Self::Error> {
///         // run inference and return boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on one raw frame and return its detections.
    ///
    /// # Arguments
    /// * `frame` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<DetectionBox>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `DetectionBox`.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<DetectionBox>;
}

impl IntoDetections for Vec<DetectionBox> {
    fn into_detections(self) -> Vec<DetectionBox> {
        self
    }
}

/// Raw `(tlwh, confidence, class_id)` rows, as most detector heads emit
/// after non-maximum suppression.
impl IntoDetections for Vec<([f32; 4], f32, i32)> {
    fn into_detections(self) -> Vec<DetectionBox> {
        self.into_iter()
            .map(|([x, y, w, h], confidence, class_id)| {
                DetectionBox::new(Rect::new(x, y, w, h), confidence, class_id)
            })
            .collect()
    }
}
