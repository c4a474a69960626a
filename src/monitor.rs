//! Per-cycle intrusion monitoring.
//!
//! [`IntrusionMonitor`] ties the track manager, the zone set and the alarm
//! together. The host owns one monitor per running pipeline and drives it
//! with [`IntrusionMonitor::step`]; pacing, pausing and frame acquisition
//! stay outside.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;

use crate::alarm::{AlarmController, AlarmState, AlarmTransition};
use crate::config::IntrusionConfig;
use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::tracker::{Detection, TrackManager, TrackState};
use crate::zones::{ZoneId, ZoneManager};

/// One confirmed track as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackReport {
    pub id: u64,
    pub bbox: BoundingBox,
    pub state: TrackState,
    /// Zones containing the track's foot-point
    pub zone_ids: BTreeSet<ZoneId>,
}

impl TrackReport {
    /// Whether the foot-point lies in at least one zone.
    pub fn is_intruding(&self) -> bool {
        !self.zone_ids.is_empty()
    }
}

/// Display counters for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleStats {
    /// Confirmed tracks
    pub track_count: usize,
    pub intruder_count: usize,
    pub zone_count: usize,
}

/// Result of one processing cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutput {
    pub tracks: Vec<TrackReport>,
    pub alarm: AlarmState,
    pub transition: AlarmTransition,
    pub stats: CycleStats,
}

/// Tracker, zones and alarm for one video source.
#[derive(Debug, Clone)]
pub struct IntrusionMonitor {
    tracker: TrackManager,
    zones: ZoneManager,
    alarm: AlarmController,
}

impl IntrusionMonitor {
    /// Validate `config` and build a monitor around `zones`.
    pub fn new(config: &IntrusionConfig, zones: ZoneManager) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracker: TrackManager::new(config.tracker.clone()),
            zones,
            alarm: AlarmController::from_config(&config.alarm)?,
        })
    }

    /// Get a reference to the track manager.
    pub fn tracker(&self) -> &TrackManager {
        &self.tracker
    }

    /// Get a reference to the zone set.
    pub fn zones(&self) -> &ZoneManager {
        &self.zones
    }

    /// Mutable zone access for editing between cycles.
    pub fn zones_mut(&mut self) -> &mut ZoneManager {
        &mut self.zones
    }

    /// Get a reference to the alarm controller.
    pub fn alarm(&self) -> &AlarmController {
        &self.alarm
    }

    /// Run one full cycle: association, lifecycle update, zone
    /// classification and alarm update.
    pub fn step(&mut self, detections: Vec<Detection>, now: Instant) -> CycleOutput {
        self.tracker.update(detections);
        self.evaluate(now)
    }

    /// Re-run zone classification and the alarm against the current track
    /// set without consuming detections, for cycles where the host skipped
    /// detection.
    pub fn reevaluate(&mut self, now: Instant) -> CycleOutput {
        self.evaluate(now)
    }

    /// Forget all tracks and alarm state; zones are kept.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.alarm.reset();
    }

    fn evaluate(&mut self, now: Instant) -> CycleOutput {
        let tracks: Vec<TrackReport> = self
            .tracker
            .confirmed()
            .map(|track| TrackReport {
                id: track.id(),
                bbox: track.bbox(),
                state: track.state(),
                zone_ids: self.zones.classify(track.bbox().foot_point()),
            })
            .collect();

        let intruders: BTreeSet<u64> = tracks
            .iter()
            .filter(|t| t.is_intruding())
            .map(|t| t.id)
            .collect();

        let transition = self.alarm.update(&intruders, now);
        let stats = CycleStats {
            track_count: tracks.len(),
            intruder_count: intruders.len(),
            zone_count: self.zones.len(),
        };

        CycleOutput {
            tracks,
            alarm: self.alarm.state().clone(),
            transition,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn monitor() -> IntrusionMonitor {
        let mut zones = ZoneManager::new();
        zones
            .add_zone(vec![(0, 0), (100, 0), (100, 100), (0, 100)])
            .unwrap();
        IntrusionMonitor::new(&IntrusionConfig::default(), zones).unwrap()
    }

    #[test]
    fn test_tentative_tracks_do_not_raise_alarm() {
        let mut monitor = monitor();
        let t0 = Instant::now();

        let out = monitor.step(vec![Detection::new(40.0, 20.0, 60.0, 80.0, 0.9)], t0);
        assert!(out.tracks.is_empty());
        assert!(!out.alarm.active);
        assert_eq!(out.stats, CycleStats { track_count: 0, intruder_count: 0, zone_count: 1 });

        let out = monitor.step(
            vec![Detection::new(41.0, 20.0, 61.0, 80.0, 0.9)],
            t0 + Duration::from_millis(100),
        );
        assert_eq!(out.tracks.len(), 1);
        assert_eq!(out.tracks[0].zone_ids, BTreeSet::from([0]));
        assert!(out.alarm.active);
        assert_eq!(out.transition, AlarmTransition::Activated);
        assert_eq!(out.stats.intruder_count, 1);
    }

    #[test]
    fn test_foot_point_decides_membership() {
        let mut monitor = monitor();
        let t0 = Instant::now();
        // Center at y=90 is inside, foot at y=130 is outside
        let det = Detection::new(40.0, 50.0, 60.0, 130.0, 0.9);
        monitor.step(vec![det], t0);
        let out = monitor.step(vec![det], t0);
        assert_eq!(out.tracks.len(), 1);
        assert!(out.tracks[0].zone_ids.is_empty());
        assert!(!out.alarm.active);
    }

    #[test]
    fn test_reevaluate_keeps_tracks() {
        let mut monitor = monitor();
        let t0 = Instant::now();
        let det = Detection::new(40.0, 20.0, 60.0, 80.0, 0.9);
        monitor.step(vec![det], t0);
        monitor.step(vec![det], t0);

        let out = monitor.reevaluate(t0 + Duration::from_secs(1));
        assert_eq!(out.tracks.len(), 1);
        assert_eq!(monitor.tracker().frame_id(), 2);
        assert_eq!(out.alarm.last_intrusion_at, Some(t0 + Duration::from_secs(1)));

        monitor.reset();
        assert!(monitor.tracker().tracks().is_empty());
        assert!(!monitor.alarm().is_active());
        assert_eq!(monitor.zones().len(), 1);
    }
}
