//! IntrusionPipeline for combining detection with intrusion monitoring.

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IntrusionConfig;
use crate::error::{Error, Result};
use crate::monitor::{CycleOutput, IntrusionMonitor};
use crate::zones::ZoneManager;

use super::{DetectionSource, ShapeFilter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run the detector on every Nth frame only
    pub process_every_n_frames: u32,
    /// Frame intervals averaged by the FPS meter
    pub fps_window: usize,
    /// Optional person-shape filter applied to detector output
    pub shape_filter: Option<ShapeFilter>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            process_every_n_frames: 2,
            fps_window: 30,
            shape_filter: None,
        }
    }
}

impl PipelineConfig {
    /// Check stride and window are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.process_every_n_frames < 1 {
            return Err(Error::InvalidConfig(
                "process_every_n_frames must be at least 1".into(),
            ));
        }
        if self.fps_window < 1 {
            return Err(Error::InvalidConfig("fps_window must be at least 1".into()));
        }
        Ok(())
    }
}

/// Rolling average of instantaneous frame rates.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    window: usize,
    samples: VecDeque<f32>,
    last: Option<Instant>,
}

impl FrameRateMeter {
    /// Create a meter averaging over `window` frame intervals.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            samples: VecDeque::with_capacity(window.max(1)),
            last: None,
        }
    }

    /// Record a frame at `now` and return the current average.
    pub fn tick(&mut self, now: Instant) -> f32 {
        if let Some(last) = self.last {
            let dt = now.saturating_duration_since(last).as_secs_f32().max(0.001);
            if self.samples.len() == self.window {
                self.samples.pop_front();
            }
            self.samples.push_back(1.0 / dt);
        }
        self.last = Some(now);
        self.average()
    }

    /// Current average, 0 before the second frame.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.last = None;
    }
}

/// Output of [`IntrusionPipeline::process_frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub cycle: CycleOutput,
    /// 1-based frame counter since start or last restart
    pub frame_index: u64,
    /// Whether the detector ran on this frame
    pub detected: bool,
    pub fps: f32,
}

/// Runs a [`DetectionSource`] and an [`IntrusionMonitor`] frame by frame.
///
/// The detector runs on every `process_every_n_frames`-th frame (starting
/// with the first); on the frames in between, zone membership and the alarm
/// are re-evaluated against the unchanged track set so the cooldown keeps
/// running on wall-clock time.
pub struct IntrusionPipeline<D: DetectionSource> {
    detector: D,
    monitor: IntrusionMonitor,
    config: PipelineConfig,
    frame_count: u64,
    fps: FrameRateMeter,
}

impl<D: DetectionSource> IntrusionPipeline<D> {
    /// Create a new pipeline around an existing monitor.
    pub fn new(detector: D, monitor: IntrusionMonitor, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let fps = FrameRateMeter::new(config.fps_window);
        Ok(Self {
            detector,
            monitor,
            config,
            frame_count: 0,
            fps,
        })
    }

    /// Create a pipeline from a single configuration, loading zones from
    /// `zones_file` (a missing or unreadable file starts with no zones).
    pub fn from_config(detector: D, config: &IntrusionConfig) -> Result<Self> {
        let zones = ZoneManager::load_or_empty(&config.zones_file);
        let monitor = IntrusionMonitor::new(config, zones)?;
        Self::new(detector, monitor, config.pipeline.clone())
    }

    /// Process one frame, running the detector if this frame is due.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        now: Instant,
    ) -> std::result::Result<PipelineOutput, D::Error> {
        self.frame_count += 1;
        let due = (self.frame_count - 1) % u64::from(self.config.process_every_n_frames) == 0;
        self.run(input, width, height, now, due)
    }

    /// Process one frame and run the detector regardless of the stride.
    pub fn process_frame_forced(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        now: Instant,
    ) -> std::result::Result<PipelineOutput, D::Error> {
        self.frame_count += 1;
        self.run(input, width, height, now, true)
    }

    /// Start over, e.g. when the video source rewinds.
    pub fn restart(&mut self) {
        self.frame_count = 0;
        self.fps.reset();
        self.monitor.reset();
    }

    /// Frames seen since start or last restart.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the intrusion monitor.
    pub fn monitor(&self) -> &IntrusionMonitor {
        &self.monitor
    }

    /// Get a mutable reference to the intrusion monitor.
    pub fn monitor_mut(&mut self) -> &mut IntrusionMonitor {
        &mut self.monitor
    }

    fn run(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        now: Instant,
        detect: bool,
    ) -> std::result::Result<PipelineOutput, D::Error> {
        let fps = self.fps.tick(now);

        let cycle = if detect {
            let mut detections = self.detector.detect(input, width, height)?;
            if let Some(filter) = &self.config.shape_filter {
                detections = filter.apply(detections);
            }
            self.monitor.step(detections, now)
        } else {
            debug!(frame = self.frame_count, "skipping detection");
            self.monitor.reevaluate(now)
        };

        Ok(PipelineOutput {
            cycle,
            frame_index: self.frame_count,
            detected: detect,
            fps,
        })
    }
}
