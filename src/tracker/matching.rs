//! Detection-to-track association.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, iou_batch};
use crate::tracker::track::Track;

/// Detection input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bbox: BoundingBox,
    /// Detector confidence in `[0, 1]`
    pub confidence: f32,
}

impl Detection {
    /// Create a detection from TLBR corners and a confidence score.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            bbox: BoundingBox::new(x1, y1, x2, y2),
            confidence,
        }
    }

    pub fn from_bbox(bbox: BoundingBox, confidence: f32) -> Self {
        Self { bbox, confidence }
    }

    /// Whether the detection may enter association: a box with positive
    /// area and a confidence inside `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        !self.bbox.is_degenerate() && (0.0..=1.0).contains(&self.confidence)
    }
}

/// Compute the `1 - IoU` cost matrix between tracks (rows) and detections (columns).
pub fn iou_distance(track_boxes: &[BoundingBox], det_boxes: &[BoundingBox]) -> Array2<f32> {
    iou_batch(track_boxes, det_boxes).mapv(|iou| 1.0 - iou)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    /// `(track index, detection index)` pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy bipartite matching over a cost matrix.
///
/// Repeatedly takes the cheapest remaining `(row, column)` pair and accepts
/// it when its IoU (`1 - cost`) reaches `iou_threshold`; both sides are then
/// removed from consideration. Equal costs resolve to the lowest row, then
/// the lowest column.
///
/// This is intentionally not a globally optimal (Hungarian) assignment:
/// matching thresholds and lifecycle tuning are calibrated against the
/// greedy behaviour.
pub fn greedy_assignment(cost_matrix: &Array2<f32>, iou_threshold: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut candidates: Vec<(f32, usize, usize)> = cost_matrix
        .indexed_iter()
        .map(|((row, col), &cost)| (cost, row, col))
        .filter(|&(cost, _, _)| 1.0 - cost >= iou_threshold)
        .collect();
    candidates.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut row_free = vec![true; num_rows];
    let mut col_free = vec![true; num_cols];
    let mut matches = Vec::new();

    for (_, row, col) in candidates {
        if row_free[row] && col_free[col] {
            row_free[row] = false;
            col_free[col] = false;
            matches.push((row, col));
        }
    }

    let unmatched_tracks = row_free
        .iter()
        .enumerate()
        .filter_map(|(i, &free)| free.then_some(i))
        .collect();
    let unmatched_detections = col_free
        .iter()
        .enumerate()
        .filter_map(|(j, &free)| free.then_some(j))
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

/// Match the current frame's detections to existing tracks.
///
/// Indices in the result refer to positions in `tracks` and `detections`.
/// Ties between equal-cost pairs go to the track with the smallest id, then
/// the detection with the smallest index, so identical inputs always yield
/// identical pairings regardless of the order of `tracks`.
pub fn associate(
    tracks: &[Track],
    detections: &[Detection],
    iou_threshold: f32,
) -> AssignmentResult {
    let mut order: Vec<usize> = (0..tracks.len()).collect();
    order.sort_by_key(|&i| tracks[i].id());

    let track_boxes: Vec<BoundingBox> = order.iter().map(|&i| tracks[i].bbox()).collect();
    let det_boxes: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();

    let cost = iou_distance(&track_boxes, &det_boxes);
    let mut result = greedy_assignment(&cost, iou_threshold);

    for (row, _) in result.matches.iter_mut() {
        *row = order[*row];
    }
    for row in result.unmatched_tracks.iter_mut() {
        *row = order[*row];
    }
    result.unmatched_tracks.sort_unstable();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_greedy_picks_lowest_cost_first() {
        // Row 0 prefers col 0 slightly, but row 1 fits col 0 much better.
        let cost = array![[0.3_f32, 0.35], [0.1, 0.9]];
        let result = greedy_assignment(&cost, 0.25);
        assert_eq!(result.matches, vec![(1, 0), (0, 1)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_greedy_is_not_optimal() {
        // Pairing (0,1) and (1,0) would match both rows; greedy takes (0,0)
        // first and leaves row 1 with nothing above threshold.
        let cost = array![[0.1_f32, 0.4], [0.4, 0.9]];
        let result = greedy_assignment(&cost, 0.25);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_tracks, vec![1]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_threshold_rejects_weak_overlap() {
        let cost = array![[0.8_f32]];
        let result = greedy_assignment(&cost, 0.25);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_ties_break_by_row_then_column() {
        let cost = array![[0.5_f32, 0.5], [0.5, 0.5]];
        let result = greedy_assignment(&cost, 0.25);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_empty_sides() {
        let no_tracks = Array2::<f32>::zeros((0, 3));
        let result = greedy_assignment(&no_tracks, 0.25);
        assert_eq!(result.unmatched_detections, vec![0, 1, 2]);

        let no_dets = Array2::<f32>::zeros((2, 0));
        let result = greedy_assignment(&no_dets, 0.25);
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_iou_distance() {
        let a = [BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
        let b = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(20.0, 20.0, 30.0, 30.0),
        ];
        let dists = iou_distance(&a, &b);
        assert!(dists[[0, 0]].abs() < 1e-6);
        assert_eq!(dists[[0, 1]], 1.0);
    }

    #[test]
    fn test_detection_validity() {
        assert!(Detection::new(0.0, 0.0, 5.0, 5.0, 0.5).is_valid());
        assert!(!Detection::new(0.0, 0.0, 0.0, 5.0, 0.5).is_valid());
        assert!(!Detection::new(5.0, 0.0, 0.0, 5.0, 0.5).is_valid());
        assert!(!Detection::new(0.0, 0.0, 5.0, 5.0, 1.5).is_valid());
        assert!(!Detection::new(0.0, 0.0, 5.0, 5.0, f32::NAN).is_valid());
    }
}
