//! Track set ownership and lifecycle management.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::tracker::matching::{self, AssignmentResult, Detection};
use crate::tracker::track::Track;

/// Configuration for the [`TrackManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Matched cycles required before a track is confirmed
    pub min_hits: u32,
    /// Consecutive missed cycles tolerated before a track is deleted
    pub max_age: u32,
    /// Minimum IoU for a detection to match a track
    pub iou_threshold: f32,
    /// Number of recent boxes kept per track
    pub history_len: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_hits: 2,
            max_age: 40,
            iou_threshold: 0.25,
            history_len: 30,
        }
    }
}

impl TrackerConfig {
    /// Reject thresholds the lifecycle cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.min_hits < 1 {
            return Err(Error::InvalidConfig("min_hits must be at least 1".into()));
        }
        if self.max_age < 1 {
            return Err(Error::InvalidConfig("max_age must be at least 1".into()));
        }
        if !(self.iou_threshold > 0.0 && self.iou_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "iou_threshold must be in (0, 1], got {}",
                self.iou_threshold
            )));
        }
        Ok(())
    }
}

/// Owns the active track set and runs association plus lifecycle updates.
///
/// Track ids are allocated per manager, start at 1 and are never reused,
/// so several managers can run side by side without sharing state.
#[derive(Debug, Clone)]
pub struct TrackManager {
    tracks: Vec<Track>,
    next_id: u64,
    frame_id: u64,
    config: TrackerConfig,
}

impl TrackManager {
    /// Create an empty track manager; ids start at 1.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
            frame_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of update cycles run so far
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// All live tracks, tentative and confirmed, in ascending id order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Live tracks that are reliable enough to report downstream.
    pub fn confirmed(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.is_confirmed())
    }

    /// Run one cycle: associate `detections` with live tracks, update
    /// matched and missed tracks, delete stale ones and start new ones.
    ///
    /// Detections with degenerate boxes or out-of-range confidence are
    /// dropped before association.
    pub fn update(&mut self, detections: Vec<Detection>) -> &[Track] {
        self.frame_id += 1;

        let total = detections.len();
        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|det| {
                let valid = det.is_valid();
                if !valid {
                    debug!(frame = self.frame_id, ?det, "dropping invalid detection");
                }
                valid
            })
            .collect();
        if detections.len() < total {
            debug!(
                frame = self.frame_id,
                dropped = total - detections.len(),
                "filtered detections before association"
            );
        }

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::associate(&self.tracks, &detections, self.config.iou_threshold);

        for (itrack, idet) in matches {
            let track = &mut self.tracks[itrack];
            if track.update(&detections[idet], self.config.min_hits) {
                debug!(track_id = track.id(), hits = track.hits(), "track confirmed");
            }
        }

        for itrack in unmatched_tracks {
            let track = &mut self.tracks[itrack];
            if track.mark_missed(self.config.max_age) {
                debug!(
                    track_id = track.id(),
                    age = track.age(),
                    hits = track.hits(),
                    "track deleted"
                );
            }
        }
        self.tracks.retain(|t| !t.is_deleted());

        for idet in unmatched_detections {
            let id = self.next_id;
            self.next_id += 1;
            let track = Track::new(
                id,
                &detections[idet],
                self.config.min_hits,
                self.config.history_len,
            );
            debug!(track_id = id, state = ?track.state(), "track created");
            self.tracks.push(track);
        }

        &self.tracks
    }

    /// Drop every live track. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        debug!(dropped = self.tracks.len(), "clearing track set");
        self.tracks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackState;

    fn det(x: f32) -> Detection {
        Detection::new(x, 100.0, x + 50.0, 200.0, 0.9)
    }

    #[test]
    fn test_confirms_on_min_hits_cycle() {
        let mut manager = TrackManager::new(TrackerConfig {
            min_hits: 3,
            ..TrackerConfig::default()
        });

        manager.update(vec![det(0.0)]);
        assert_eq!(manager.tracks()[0].state(), TrackState::Tentative);
        manager.update(vec![det(2.0)]);
        assert_eq!(manager.tracks()[0].state(), TrackState::Tentative);
        manager.update(vec![det(4.0)]);
        assert_eq!(manager.tracks()[0].state(), TrackState::Confirmed);
        assert_eq!(manager.confirmed().count(), 1);
    }

    #[test]
    fn test_deleted_after_max_age_misses() {
        let mut manager = TrackManager::new(TrackerConfig {
            max_age: 5,
            ..TrackerConfig::default()
        });
        manager.update(vec![det(0.0)]);

        for _ in 0..5 {
            manager.update(vec![]);
        }
        assert_eq!(manager.tracks().len(), 1);
        assert_eq!(manager.tracks()[0].time_since_update(), 5);

        manager.update(vec![]);
        assert!(manager.tracks().is_empty());
    }

    #[test]
    fn test_tentative_tracks_also_expire() {
        let mut manager = TrackManager::new(TrackerConfig {
            min_hits: 5,
            max_age: 1,
            ..TrackerConfig::default()
        });
        manager.update(vec![det(0.0)]);
        manager.update(vec![]);
        assert_eq!(manager.tracks().len(), 1);
        manager.update(vec![]);
        assert!(manager.tracks().is_empty());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut manager = TrackManager::new(TrackerConfig {
            max_age: 1,
            ..TrackerConfig::default()
        });
        manager.update(vec![det(0.0)]);
        let first = manager.tracks()[0].id();
        manager.update(vec![]);
        manager.update(vec![]);
        assert!(manager.tracks().is_empty());

        manager.update(vec![det(0.0)]);
        assert!(manager.tracks()[0].id() > first);
    }

    #[test]
    fn test_degenerate_detections_dropped() {
        let mut manager = TrackManager::new(TrackerConfig::default());
        manager.update(vec![
            Detection::new(10.0, 10.0, 10.0, 50.0, 0.9),
            Detection::new(60.0, 10.0, 20.0, 50.0, 0.9),
            det(300.0),
        ]);
        assert_eq!(manager.tracks().len(), 1);
        assert_eq!(manager.tracks()[0].bbox(), det(300.0).bbox);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            TrackerConfig { min_hits: 0, ..TrackerConfig::default() },
            TrackerConfig { max_age: 0, ..TrackerConfig::default() },
            TrackerConfig { iou_threshold: 0.0, ..TrackerConfig::default() },
            TrackerConfig { iou_threshold: 1.5, ..TrackerConfig::default() },
            TrackerConfig { iou_threshold: f32::NAN, ..TrackerConfig::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
        assert!(TrackerConfig::default().validate().is_ok());
    }
}
