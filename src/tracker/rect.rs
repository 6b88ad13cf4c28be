/// Bounding box representation with format conversion utilities.
///
/// Supports three bounding box formats:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
/// - XYSR: Center X, Center Y, Scale (area), Aspect Ratio (w/h)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

/// Unions smaller than this yield an IoU of zero.
const UNION_EPSILON: f32 = f32::EPSILON;

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Rect from XYSR format (center x, center y, area, aspect ratio).
    ///
    /// Width and height are clamped at zero when the scale or ratio have
    /// drifted non-positive. The origin is left as computed and may be negative.
    #[inline]
    pub fn from_xysr(cx: f64, cy: f64, scale: f64, ratio: f64) -> Self {
        let sr = scale * ratio;
        let width = if sr > 0.0 { sr.sqrt() } else { 0.0 };
        let height = if width > 0.0 {
            (scale / width).max(0.0)
        } else {
            0.0
        };
        Self {
            x: (cx - width / 2.0) as f32,
            y: (cy - height / 2.0) as f32,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Convert to XYSR format: (center_x, center_y, area, aspect_ratio).
    #[inline]
    pub fn to_xysr(&self) -> [f64; 4] {
        let width = self.width as f64;
        let height = self.height as f64;
        let cx = self.x as f64 + width / 2.0;
        let cy = self.y as f64 + height / 2.0;
        let ratio = if height > 0.0 { width / height } else { 0.0 };
        [cx, cy, width * height, ratio]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Whether either origin coordinate lies left of / above the frame.
    #[inline]
    pub fn has_negative_origin(&self) -> bool {
        self.x < 0.0 || self.y < 0.0
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Degenerate pairs whose union is (nearly) empty score zero.
    pub fn iou(&self, other: &Rect) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        let inter_area = inter_width * inter_height;

        let union_area = self.area() + other.area() - inter_area;

        if union_area < UNION_EPSILON {
            0.0
        } else {
            inter_area / union_area
        }
    }
}

use ndarray::Array2;

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[Rect], boxes_b: &[Rect]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}
