use super::MotionDetector;
use anyhow::Result;
use image::GrayImage;

/// Frame-differencing motion detector
///
/// Compares each frame against the previous one and counts pixels whose
/// intensity changed by more than `pixel_delta`. The first frame (or the
/// first frame after a resolution change) establishes the baseline and
/// reports zero motion.
pub struct FrameDiffDetector {
    pixel_delta: u8,
    previous: Option<GrayImage>,
}

impl FrameDiffDetector {
    pub fn new(pixel_delta: u8) -> Self {
        Self {
            pixel_delta,
            previous: None,
        }
    }
}

impl MotionDetector for FrameDiffDetector {
    fn motion_area(&mut self, frame: &GrayImage) -> Result<u64> {
        let area = match &self.previous {
            Some(prev) if prev.dimensions() == frame.dimensions() => {
                let mut changed = 0u64;
                for (curr, prev) in frame.as_raw().iter().zip(prev.as_raw().iter()) {
                    if curr.abs_diff(*prev) > self.pixel_delta {
                        changed += 1;
                    }
                }
                changed
            }
            _ => {
                tracing::debug!("no baseline frame yet, reporting zero motion");
                0
            }
        };

        self.previous = Some(frame.clone());

        Ok(area)
    }

    fn reset(&mut self) {
        tracing::debug!("resetting frame-diff baseline");
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_frame(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, image::Luma([value]))
    }

    /// Flat frame with a brighter rectangle painted over it.
    fn frame_with_patch(width: u32, height: u32, patch: (u32, u32, u32, u32)) -> GrayImage {
        let (px, py, pw, ph) = patch;
        GrayImage::from_fn(width, height, |x, y| {
            if x >= px && x < px + pw && y >= py && y < py + ph {
                image::Luma([200])
            } else {
                image::Luma([64])
            }
        })
    }

    #[test]
    fn test_first_frame_reports_zero() {
        let mut detector = FrameDiffDetector::new(32);
        let frame = frame_with_patch(100, 100, (10, 10, 20, 20));
        assert_eq!(detector.motion_area(&frame).unwrap(), 0);
    }

    #[test]
    fn test_identical_frames_report_zero() {
        let mut detector = FrameDiffDetector::new(32);
        let frame = flat_frame(100, 100, 64);
        detector.motion_area(&frame).unwrap();
        assert_eq!(detector.motion_area(&frame).unwrap(), 0);
    }

    #[test]
    fn test_changed_patch_reports_its_area() {
        let mut detector = FrameDiffDetector::new(32);
        detector.motion_area(&flat_frame(100, 100, 64)).unwrap();

        let area = detector
            .motion_area(&frame_with_patch(100, 100, (10, 10, 20, 20)))
            .unwrap();
        assert_eq!(area, 20 * 20);
    }

    #[test]
    fn test_subthreshold_change_reports_zero() {
        let mut detector = FrameDiffDetector::new(32);
        detector.motion_area(&flat_frame(100, 100, 64)).unwrap();

        // 64 -> 80 is a delta of 16, below the threshold of 32.
        let area = detector.motion_area(&flat_frame(100, 100, 80)).unwrap();
        assert_eq!(area, 0);
    }

    #[test]
    fn test_resolution_change_rebaselines() {
        let mut detector = FrameDiffDetector::new(32);
        detector.motion_area(&flat_frame(100, 100, 64)).unwrap();

        // Different dimensions: new baseline, no comparison.
        assert_eq!(detector.motion_area(&flat_frame(50, 50, 200)).unwrap(), 0);
        // Back to comparable frames.
        assert_eq!(detector.motion_area(&flat_frame(50, 50, 200)).unwrap(), 0);
    }

    #[test]
    fn test_reset_clears_baseline() {
        let mut detector = FrameDiffDetector::new(32);
        detector.motion_area(&flat_frame(100, 100, 64)).unwrap();
        detector.reset();

        // After reset, the next frame is a baseline again.
        let area = detector.motion_area(&flat_frame(100, 100, 200)).unwrap();
        assert_eq!(area, 0);
    }
}
