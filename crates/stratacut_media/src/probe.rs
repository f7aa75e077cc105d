use serde::Deserialize;
use std::path::Path;

use stratacut_core::types::{LayerContent, TrackKind};

use crate::error::{MediaError, Result};

/// Timeline width given to still images, which have no intrinsic duration.
pub const DEFAULT_STILL_DURATION: f64 = 100.0;

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Vec<FfprobeStream>,
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    channels: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// What a media source looks like to the timeline: its natural duration in
/// timeline units (seconds) and the track kind it belongs on.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub kind: TrackKind,
}

/// Run ffprobe on a media file and parse the result into a `SourceInfo`.
pub fn probe_source(path: impl AsRef<Path>) -> Result<SourceInfo> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let output = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| MediaError::FfprobeExec(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::FfprobeFailed(stderr.into_owned()));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    Ok(parse_probe_output(path, &probe))
}

/// Probe a media file and produce the layer payload plus the duration a new
/// layer for it should get, ready for `Timeline::add_layer`.
pub fn layer_content_for(path: impl AsRef<Path>) -> Result<(LayerContent, f64)> {
    let path = path.as_ref();
    let info = probe_source(path)?;
    let url = path.to_string_lossy().into_owned();

    let content = match info.kind {
        TrackKind::Audio => LayerContent::Audio { url },
        TrackKind::Video => LayerContent::Video { url },
        TrackKind::Image => LayerContent::Image { url },
        // Probing never yields text; a text layer has no media source.
        TrackKind::Text => LayerContent::Text { text: String::new() },
    };

    let duration = if info.duration > 0.0 {
        info.duration
    } else {
        DEFAULT_STILL_DURATION
    };

    Ok((content, duration))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_probe_output(path: &Path, probe: &FfprobeOutput) -> SourceInfo {
    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");
    let audio_stream = probe.streams.iter().find(|s| s.codec_type == "audio");

    let duration = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let width = video_stream.and_then(|s| s.width).unwrap_or(0);
    let height = video_stream.and_then(|s| s.height).unwrap_or(0);
    let audio_channels = audio_stream.and_then(|s| s.channels).unwrap_or(0);

    let kind = detect_kind(path, width, height, audio_channels);

    SourceInfo {
        duration,
        width,
        height,
        kind,
    }
}

/// Detect the track kind from the file extension, falling back to the
/// stream shape.
fn detect_kind(path: &Path, width: u32, height: u32, audio_channels: u32) -> TrackKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tiff" | "svg" => TrackKind::Image,
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "m4a" | "wma" => TrackKind::Audio,
        _ => {
            if width > 0 && height > 0 {
                TrackKind::Video
            } else if audio_channels > 0 {
                TrackKind::Audio
            } else {
                TrackKind::Video // default fallback
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_kind_by_extension() {
        assert_eq!(detect_kind(Path::new("photo.png"), 0, 0, 0), TrackKind::Image);
        assert_eq!(detect_kind(Path::new("PHOTO.JPG"), 0, 0, 0), TrackKind::Image);
        assert_eq!(detect_kind(Path::new("song.mp3"), 0, 0, 0), TrackKind::Audio);
    }

    #[test]
    fn detect_kind_by_stream_shape() {
        assert_eq!(detect_kind(Path::new("clip.mkv"), 1920, 1080, 2), TrackKind::Video);
        assert_eq!(detect_kind(Path::new("track.unknown"), 0, 0, 2), TrackKind::Audio);
        assert_eq!(detect_kind(Path::new("mystery.bin"), 0, 0, 0), TrackKind::Video);
    }

    #[test]
    fn parse_probe_output_video_and_audio() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "width": 1920,
                    "height": 1080
                },
                {
                    "codec_type": "audio",
                    "channels": 2
                }
            ],
            "format": {
                "duration": "10.5"
            }
        }"#;
        let output: FfprobeOutput = serde_json::from_str(json).unwrap();
        let info = parse_probe_output(Path::new("clip.mp4"), &output);

        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert_eq!(info.kind, TrackKind::Video);
        assert!((info.duration - 10.5).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_probe_output_audio_only() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "audio",
                    "channels": 2
                }
            ],
            "format": {
                "duration": "180.0"
            }
        }"#;
        let output: FfprobeOutput = serde_json::from_str(json).unwrap();
        let info = parse_probe_output(Path::new("voice.xyz"), &output);

        assert_eq!(info.width, 0);
        assert_eq!(info.kind, TrackKind::Audio);
        assert!((info.duration - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_probe_output_missing_streams() {
        let json = r#"{
            "streams": [],
            "format": {}
        }"#;
        let output: FfprobeOutput = serde_json::from_str(json).unwrap();
        let info = parse_probe_output(Path::new("still.png"), &output);

        assert_eq!(info.kind, TrackKind::Image);
        assert!((info.duration - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn probe_nonexistent_file_returns_error() {
        let result = probe_source("/tmp/does_not_exist_stratacut_probe_test.mp4");
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
