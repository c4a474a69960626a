//! Single tracked object.

use std::collections::VecDeque;

use crate::geometry::BoundingBox;
use crate::tracker::matching::Detection;
use crate::tracker::track_state::TrackState;

/// A single tracked object with its lifecycle counters.
///
/// Tracks are owned by [`TrackManager`](crate::tracker::TrackManager);
/// everything outside the manager only sees them through shared references.
#[derive(Debug, Clone)]
pub struct Track {
    id: u64,
    bbox: BoundingBox,
    state: TrackState,
    confidence: f32,
    hits: u32,
    age: u32,
    time_since_update: u32,
    history: VecDeque<BoundingBox>,
    history_len: usize,
}

impl Track {
    /// Start a new tentative track from an unmatched detection.
    pub(crate) fn new(id: u64, detection: &Detection, min_hits: u32, history_len: usize) -> Self {
        let mut track = Self {
            id,
            bbox: detection.bbox,
            state: TrackState::Tentative,
            confidence: detection.confidence,
            hits: 1,
            age: 1,
            time_since_update: 0,
            history: VecDeque::with_capacity(history_len),
            history_len,
        };
        track.push_history(detection.bbox);
        if track.hits >= min_hits {
            track.state = TrackState::Confirmed;
        }
        track
    }

    /// Unique, never reused track identifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Last known bounding box
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Confidence of the most recently matched detection
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Cycles with a matched detection since creation
    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// Cycles since creation
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Consecutive cycles without a matched detection
    pub fn time_since_update(&self) -> u32 {
        self.time_since_update
    }

    /// Recent matched boxes, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &BoundingBox> {
        self.history.iter()
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    pub fn is_deleted(&self) -> bool {
        self.state == TrackState::Deleted
    }

    /// Apply a matched detection. Returns `true` if this update confirmed the track.
    pub(crate) fn update(&mut self, detection: &Detection, min_hits: u32) -> bool {
        self.bbox = detection.bbox;
        self.confidence = detection.confidence;
        self.hits += 1;
        self.age += 1;
        self.time_since_update = 0;
        self.push_history(detection.bbox);

        if self.state == TrackState::Tentative && self.hits >= min_hits {
            self.state = TrackState::Confirmed;
            return true;
        }
        false
    }

    /// Age the track through a cycle without a match; the box is held.
    /// Returns `true` once the track has exceeded `max_age` and is deleted.
    pub(crate) fn mark_missed(&mut self, max_age: u32) -> bool {
        self.age += 1;
        self.time_since_update += 1;
        if self.time_since_update > max_age {
            self.mark_deleted();
            return true;
        }
        false
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.state = TrackState::Deleted;
    }

    fn push_history(&mut self, bbox: BoundingBox) {
        if self.history_len == 0 {
            return;
        }
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(bbox);
    }
}
