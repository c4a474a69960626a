//! Builder for turning raw detector outputs into [`Detection`] values.

use crate::geometry::BoundingBox;
use crate::tracker::Detection;

/// Builds a [`Detection`] from whichever box layout a detector emits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionBuilder {
    bbox: BoundingBox,
    confidence: f32,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = BoundingBox::new(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::from_tlwh(x, y, w, h);
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn build(self) -> Detection {
        Detection::from_bbox(self.bbox, self.confidence)
    }

    /// Build only if the detection would be accepted by the tracker.
    pub fn try_build(self) -> Option<Detection> {
        let det = self.build();
        det.is_valid().then_some(det)
    }
}
