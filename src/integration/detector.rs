//! Detector boundary.

use crate::tracker::Detection;

/// A single-class object detector feeding the intrusion monitor.
///
/// Implementations return detections already filtered by their own
/// confidence threshold; the monitor applies no further confidence
/// filtering.
///
/// # Example
///
/// ```
/// use zone_sentry::Detection;
/// use zone_sentry::integration::DetectionSource;
///
/// struct FixedDetector(Vec<Detection>);
///
/// impl DetectionSource for FixedDetector {
///     type Error = std::convert::Infallible;
///
///     fn detect(&mut self, _input: &[u8], _width: u32, _height: u32) -> Result<Vec<Detection>, Self::Error> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on one frame.
    ///
    /// # Arguments
    /// * `input` - Raw frame bytes (layout depends on the implementation)
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}
