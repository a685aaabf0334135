mod analysis;
mod detector;
mod source;

use analysis::{ActivityReport, SegmentAccumulator};
use anyhow::{Context, Result};
use clap::Parser;
use detector::{FrameDiffDetector, MotionDetector};
use source::{FfmpegSource, FrameSource};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the video file to analyze
    video: PathBuf,

    /// Minimum motion-pixel area for a frame to count as active
    #[arg(short = 'a', long, default_value_t = 5000)]
    min_area: u64,

    /// Per-pixel intensity difference treated as motion
    #[arg(long, default_value_t = 32)]
    pixel_delta: u8,

    /// Override the frame rate reported by the container
    #[arg(long)]
    fps: Option<f64>,

    /// Print the report as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Actimeter starting");
    tracing::info!("Video: {}", args.video.display());
    tracing::info!("Motion area threshold: {} px", args.min_area);
    tracing::info!("Pixel delta: {}", args.pixel_delta);

    let mut source =
        FfmpegSource::open(&args.video).context("Failed to open video source")?;

    let fps = args.fps.unwrap_or_else(|| source.frame_rate());
    if args.fps.is_some() {
        tracing::info!("Frame rate overridden to {:.3} fps", fps);
    }

    let mut detector = FrameDiffDetector::new(args.pixel_delta);

    let report = run_analysis(&mut source, &mut detector, args.min_area, fps)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Scan the frame stream once and produce the activity report.
fn run_analysis<S, D>(
    source: &mut S,
    detector: &mut D,
    min_area: u64,
    fps: f64,
) -> Result<ActivityReport>
where
    S: FrameSource,
    D: MotionDetector,
{
    let mut accumulator = SegmentAccumulator::new(fps)?;

    tracing::info!("Starting analysis pass");

    let mut frame_count = 0u64;
    while let Some(frame) = source.next_frame().context("Failed to decode frame")? {
        let area = detector
            .motion_area(&frame)
            .context("Failed to measure frame motion")?;

        accumulator.push(area > min_area);
        frame_count += 1;

        // Log progress every 300 frames
        if frame_count % 300 == 0 {
            tracing::debug!("Processed {} frames", frame_count);
        }
    }

    if let Some(expected) = source.frame_count_hint() {
        if expected != frame_count {
            tracing::warn!(
                "Container reported {} frames but {} were decoded",
                expected,
                frame_count
            );
        }
    }

    tracing::info!("Analysis complete: {} frames", frame_count);

    Ok(accumulator.finish())
}

fn print_report(report: &ActivityReport) {
    let segments = report
        .active_segments
        .iter()
        .map(|d| format!("{:.2}", d))
        .collect::<Vec<_>>()
        .join(", ");

    println!("fps:                  {:.3}", report.fps);
    println!("frames:               {}", report.frame_count);
    println!("total time:           {:.2} s", report.total_time);
    println!("total active time:    {:.2} s", report.total_active_time);
    println!("active segments (s):  [{}]", segments);
    println!("mean segment:         {:.2} s", report.mean_segment_duration);
    println!("segment std dev:      {:.2} s", report.std_segment_duration);
}
