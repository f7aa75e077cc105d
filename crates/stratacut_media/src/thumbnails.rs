use std::path::{Path, PathBuf};

use crate::error::{MediaError, Result};

/// Extract a single preview frame at a specific time from a media file.
pub fn extract_thumbnail(
    source_path: &Path,
    output_path: &Path,
    time_seconds: f64,
    width: u32,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(MediaError::Io)?;
    }

    let status = std::process::Command::new("ffmpeg")
        .args([
            "-y",
            "-ss",
            &format!("{time_seconds:.3}"),
            "-i",
            &source_path.to_string_lossy(),
            "-vframes",
            "1",
            "-vf",
            &format!("scale={width}:-1"),
            "-q:v",
            "5",
            &output_path.to_string_lossy(),
        ])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map_err(MediaError::Io)?;

    if !status.success() {
        return Err(MediaError::FfmpegFailed(
            "Thumbnail extraction failed".into(),
        ));
    }
    Ok(())
}

/// Extract `count` evenly spaced preview frames for a layer's source,
/// cached under `<cache_dir>/<key>/`. Frames already on disk are not
/// re-extracted. Returns (time_seconds, path) pairs in timeline order.
pub fn thumbnail_strip(
    source_path: &Path,
    cache_dir: &Path,
    key: &str,
    duration_seconds: f64,
    count: usize,
    thumb_width: u32,
) -> Result<Vec<(f64, PathBuf)>> {
    let strip_dir = cache_dir.join(key);
    std::fs::create_dir_all(&strip_dir).map_err(MediaError::Io)?;

    let mut results = Vec::with_capacity(count);
    for t in strip_times(duration_seconds, count) {
        let time_ms = (t * 1_000.0) as i64;
        let thumb_path = strip_dir.join(format!("{time_ms}.jpg"));

        if !thumb_path.exists() {
            extract_thumbnail(source_path, &thumb_path, t, thumb_width)?;
        }

        results.push((t, thumb_path));
    }

    tracing::debug!("thumbnail strip ready: {} frames for {key}", results.len());
    Ok(results)
}

/// Sample times for a strip of `count` frames: the center of each of the
/// `count` equal slices of the duration, so the first and last frames do not
/// degenerate to the extremes.
fn strip_times(duration_seconds: f64, count: usize) -> Vec<f64> {
    let slice = duration_seconds / count as f64;
    (0..count)
        .map(|i| (i as f64 + 0.5) * slice)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
