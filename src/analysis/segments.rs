use super::stats;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f64),
}

/// Summary of one analysis pass over a video's frames.
///
/// All times and durations are seconds. `active_segments` lists the
/// duration of each maximal run of active frames, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityReport {
    pub fps: f64,
    pub frame_count: u64,
    pub total_time: f64,
    pub total_active_time: f64,
    pub active_segments: Vec<f64>,
    pub mean_segment_duration: f64,
    pub std_segment_duration: f64,
}

/// Incremental consumer of per-frame activity flags.
///
/// Feed one flag per frame with [`push`], in display order, then call
/// [`finish`] to close any still-open run and produce the report. The
/// accumulator owns the frame index, so callers cannot feed it a gapped
/// or reordered sequence.
///
/// [`push`]: SegmentAccumulator::push
/// [`finish`]: SegmentAccumulator::finish
pub struct SegmentAccumulator {
    fps: f64,
    frame_index: u64,
    segment_start: Option<u64>,
    segments: Vec<f64>,
}

impl SegmentAccumulator {
    pub fn new(fps: f64) -> Result<Self, AnalysisError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnalysisError::InvalidFrameRate(fps));
        }
        Ok(Self {
            fps,
            frame_index: 0,
            segment_start: None,
            segments: Vec::new(),
        })
    }

    /// Record the activity flag for the next frame.
    ///
    /// A false→true transition opens a run at the current frame; a
    /// true→false transition closes it just before the current frame.
    pub fn push(&mut self, active: bool) {
        match (active, self.segment_start) {
            (true, None) => self.segment_start = Some(self.frame_index),
            (false, Some(start)) => {
                self.close_segment(start);
            }
            _ => {}
        }
        self.frame_index += 1;
    }

    /// Close any still-open run and produce the report.
    ///
    /// A run that is still active at the last frame is closed at the
    /// one-past-the-end index, exactly as if one more inactive frame had
    /// followed the stream, so trailing activity is never dropped.
    pub fn finish(mut self) -> ActivityReport {
        if let Some(start) = self.segment_start.take() {
            self.close_segment(start);
        }

        // Left-to-right sum over the segment list, so the total matches
        // the list exactly under floating point.
        let total_active_time = self.segments.iter().sum::<f64>();

        ActivityReport {
            fps: self.fps,
            frame_count: self.frame_index,
            total_time: self.frame_index as f64 / self.fps,
            total_active_time,
            mean_segment_duration: stats::mean(&self.segments),
            std_segment_duration: stats::sample_std_dev(&self.segments),
            active_segments: self.segments,
        }
    }

    fn close_segment(&mut self, start: u64) {
        self.segments
            .push((self.frame_index - start) as f64 / self.fps);
        self.segment_start = None;
    }
}
