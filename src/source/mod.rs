mod ffmpeg;

pub use ffmpeg::FfmpegSource;

use anyhow::Result;
use image::GrayImage;

/// Trait for ordered, finite sources of decoded video frames
pub trait FrameSource {
    /// Fetch the next frame in display order, or `None` once the stream
    /// is exhausted
    fn next_frame(&mut self) -> Result<Option<GrayImage>>;

    /// Frames per second of the stream
    fn frame_rate(&self) -> f64;

    /// Frame count reported by the container, if known
    ///
    /// Some containers do not record it; analysis counts decoded frames
    /// itself and only uses this as a cross-check.
    fn frame_count_hint(&self) -> Option<u64>;
}
