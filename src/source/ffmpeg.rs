use super::FrameSource;
use anyhow::{anyhow, bail, Context, Result};
use image::GrayImage;
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Video stream metadata reported by ffprobe.
#[derive(Debug, Clone, PartialEq)]
struct StreamInfo {
    width: u32,
    height: u32,
    frame_rate: f64,
    frame_count: Option<u64>,
}

/// Frame source backed by an ffmpeg child process
///
/// Probes the container with `ffprobe`, then streams raw grayscale
/// frames from `ffmpeg`'s stdout, one `width * height` buffer per frame.
pub struct FfmpegSource {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    frame_rate: f64,
    frame_count: Option<u64>,
}

impl FfmpegSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Probing video at {}", path.display());

        let info = probe(path)?;
        tracing::info!(
            "Stream: {}x{} at {:.3} fps, {} frames",
            info.width,
            info.height,
            info.frame_rate,
            info.frame_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "gray", "-"])
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start ffmpeg for {}", path.display()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("ffmpeg child has no stdout handle"))?;

        Ok(Self {
            child,
            stdout,
            width: info.width,
            height: info.height,
            frame_rate: info.frame_rate,
            frame_count: info.frame_count,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn next_frame(&mut self) -> Result<Option<GrayImage>> {
        let mut buf = vec![0u8; (self.width * self.height) as usize];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .stdout
                .read(&mut buf[filled..])
                .context("failed to read frame data from ffmpeg")?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                bail!(
                    "truncated frame from ffmpeg: got {} of {} bytes",
                    filled,
                    buf.len()
                );
            }
            filled += n;
        }

        let frame = GrayImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| anyhow!("frame buffer does not match probed dimensions"))?;
        Ok(Some(frame))
    }

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn frame_count_hint(&self) -> Option<u64> {
        self.frame_count
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        // The decode loop may stop before the stream ends; reap the child
        // either way so it does not linger.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Probe the first video stream of a file with ffprobe.
fn probe(path: &Path) -> Result<StreamInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,nb_frames",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .context("failed to run ffprobe (is it installed?)")?;

    if !output.status.success() {
        bail!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("unexpected ffprobe output for {}", path.display()))
}

/// Parse ffprobe's `key=value` line output into stream metadata.
fn parse_probe_output(text: &str) -> Result<StreamInfo> {
    let field = |key: &str| -> Option<&str> {
        text.lines()
            .filter_map(|line| line.trim().strip_prefix(key)?.strip_prefix('='))
            .next()
    };

    let width: u32 = field("width")
        .ok_or_else(|| anyhow!("missing width"))?
        .parse()
        .context("bad width")?;
    let height: u32 = field("height")
        .ok_or_else(|| anyhow!("missing height"))?
        .parse()
        .context("bad height")?;
    let frame_rate = parse_frame_rate(field("avg_frame_rate").ok_or_else(|| anyhow!("missing avg_frame_rate"))?)?;

    // nb_frames is "N/A" for containers that do not record it.
    let frame_count = field("nb_frames").and_then(|v| v.parse::<u64>().ok());

    Ok(StreamInfo {
        width,
        height,
        frame_rate,
        frame_count,
    })
}

/// Parse ffprobe's `num/den` frame-rate fraction (or a plain number).
fn parse_frame_rate(value: &str) -> Result<f64> {
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().context("bad frame rate numerator")?;
            let den: f64 = den.trim().parse().context("bad frame rate denominator")?;
            if den == 0.0 {
                bail!("frame rate denominator is zero in {value:?}");
            }
            num / den
        }
        None => value.trim().parse().context("bad frame rate")?,
    };
    Ok(rate)
}
