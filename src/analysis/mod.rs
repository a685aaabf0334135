mod segments;
mod stats;

pub use segments::{ActivityReport, AnalysisError, SegmentAccumulator};

/// Run the segment analysis over a complete sequence of activity flags.
pub fn analyze_flags<I>(fps: f64, flags: I) -> Result<ActivityReport, AnalysisError>
where
    I: IntoIterator<Item = bool>,
{
    let mut acc = SegmentAccumulator::new(fps)?;
    for active in flags {
        acc.push(active);
    }
    Ok(acc.finish())
}
