use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TrackKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
    Image,
    Text,
}

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

/// A horizontal lane. Purely a grouping key for layers; layers reference it
/// by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    pub kind: TrackKind,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// LayerContent
// ---------------------------------------------------------------------------

/// Payload carried by a layer. Audio, video, and image layers reference
/// their media by URL; text layers hold the text inline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LayerContent {
    Audio { url: String },
    Video { url: String },
    Image { url: String },
    Text { text: String },
}

impl LayerContent {
    pub fn kind(&self) -> TrackKind {
        match self {
            LayerContent::Audio { .. } => TrackKind::Audio,
            LayerContent::Video { .. } => TrackKind::Video,
            LayerContent::Image { .. } => TrackKind::Image,
            LayerContent::Text { .. } => TrackKind::Text,
        }
    }

    /// Media URL for audio/video/image layers, `None` for text.
    pub fn url(&self) -> Option<&str> {
        match self {
            LayerContent::Audio { url }
            | LayerContent::Video { url }
            | LayerContent::Image { url } => Some(url),
            LayerContent::Text { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// A time-bounded segment on a track. `start`/`end` are half-open
/// `[start, end)` coordinates in timeline units, not pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    pub id: String,
    pub track_id: String,
    pub start: f64,
    pub end: f64,
    pub content: LayerContent,
}

impl Layer {
    pub fn new(track_id: impl Into<String>, start: f64, end: f64, content: LayerContent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            track_id: track_id.into(),
            start,
            end,
            content,
        }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn kind(&self) -> TrackKind {
        self.content.kind()
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which edge of a layer a resize gesture moves, and therefore which side
/// neighboring layers are pushed toward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// The caller-owned state container: tracks plus the single flat layer list
/// keyed by `track_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    pub tracks: Vec<Track>,
    pub layers: Vec<Layer>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
