//! Zone intrusion detection on top of IoU-based multi-object tracking.
//!
//! Each processing cycle consumes one frame's detections, associates them
//! with existing tracks, updates track lifecycles, classifies confirmed
//! tracks against restricted zones and drives a debounced alarm.
//!
//! ```
//! use std::time::Instant;
//! use zone_sentry::{Detection, IntrusionConfig, IntrusionMonitor, ZoneManager};
//!
//! let mut zones = ZoneManager::new();
//! zones.add_zone(vec![(0, 0), (200, 0), (200, 200), (0, 200)]).unwrap();
//!
//! let mut monitor = IntrusionMonitor::new(&IntrusionConfig::default(), zones).unwrap();
//! let output = monitor.step(vec![Detection::new(50.0, 50.0, 80.0, 120.0, 0.9)], Instant::now());
//! assert_eq!(output.stats.zone_count, 1);
//! ```

pub mod alarm;
pub mod config;
pub mod error;
pub mod geometry;
pub mod integration;
pub mod monitor;
pub mod tracker;
pub mod zones;

pub use alarm::{AlarmConfig, AlarmController, AlarmState, AlarmTransition};
pub use config::IntrusionConfig;
pub use error::{Error, Result};
pub use geometry::{BoundingBox, Point};
pub use monitor::{CycleOutput, CycleStats, IntrusionMonitor, TrackReport};
pub use tracker::{Detection, Track, TrackManager, TrackState, TrackerConfig};
pub use zones::{Vertex, Zone, ZoneId, ZoneManager};
