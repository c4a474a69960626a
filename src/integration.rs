//! Host-side helpers for connecting a detector to the intrusion monitor.
//!
//! The core ([`IntrusionMonitor`](crate::IntrusionMonitor)) only consumes
//! per-frame detections. This module provides the detector boundary trait
//! and a pipeline that runs detection every Nth frame, filters detections
//! by shape and keeps a rolling frame rate for display.

mod builder;
mod detector;
mod pipeline;
mod shape_filter;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::{FrameRateMeter, IntrusionPipeline, PipelineConfig, PipelineOutput};
pub use shape_filter::ShapeFilter;
