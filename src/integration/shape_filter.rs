use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tracker::Detection;

/// Drops detections whose box cannot plausibly be a standing person.
///
/// Intended for detector adapters; the monitor itself does not filter by
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeFilter {
    pub min_width: f32,
    pub min_height: f32,
    /// Lower bound on height / width
    pub min_aspect: f32,
    /// Upper bound on height / width
    pub max_aspect: f32,
}

impl Default for ShapeFilter {
    fn default() -> Self {
        Self {
            min_width: 20.0,
            min_height: 40.0,
            min_aspect: 1.0,
            max_aspect: 5.0,
        }
    }
}

impl ShapeFilter {
    /// Whether a detection is plausibly a standing person.
    pub fn accepts(&self, det: &Detection) -> bool {
        let w = det.bbox.width();
        let h = det.bbox.height();
        if w < self.min_width || h < self.min_height {
            return false;
        }
        let aspect = h / w.max(1.0);
        (self.min_aspect..=self.max_aspect).contains(&aspect)
    }

    pub fn apply(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let total = detections.len();
        let kept: Vec<Detection> = detections.into_iter().filter(|d| self.accepts(d)).collect();
        if kept.len() < total {
            debug!(dropped = total - kept.len(), "shape filter rejected detections");
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_shapes() {
        let filter = ShapeFilter::default();
        let person = Detection::new(0.0, 0.0, 40.0, 100.0, 0.9);
        let too_small = Detection::new(0.0, 0.0, 10.0, 100.0, 0.9);
        let too_wide = Detection::new(0.0, 0.0, 120.0, 60.0, 0.9);
        let too_thin = Detection::new(0.0, 0.0, 20.0, 150.0, 0.9);

        assert!(filter.accepts(&person));
        assert!(!filter.accepts(&too_small));
        assert!(!filter.accepts(&too_wide));
        assert!(!filter.accepts(&too_thin));

        let kept = filter.apply(vec![too_small, person, too_wide]);
        assert_eq!(kept, vec![person]);
    }
}
