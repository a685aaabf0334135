mod frame_diff;

pub use frame_diff::FrameDiffDetector;

use anyhow::Result;
use image::GrayImage;

/// Trait for per-frame motion measurement
///
/// Allows swapping between different detection backends.
pub trait MotionDetector {
    /// Measure the motion-pixel area of a frame against the prior scene
    ///
    /// # Arguments
    /// * `frame` - Grayscale frame in display order
    ///
    /// # Returns
    /// * Number of pixels considered in motion
    fn motion_area(&mut self, frame: &GrayImage) -> Result<u64>;

    /// Reset internal state (for detectors with temporal components)
    ///
    /// Call this when starting a new video or after a scene cut.
    fn reset(&mut self) {
        // Default implementation: no-op for stateless detectors
    }
}
