//! Layer arrangement engine for a multi-track, non-destructive timeline
//! editor: collision detection, chain-push resize with proportional
//! shrink-to-fit, drop resolution, and splitting, as pure functions over a
//! caller-owned layer collection.

pub mod drop;
pub mod editing;
pub mod error;
pub mod geometry;
pub mod overlap;
pub mod resize;
pub mod snapping;
pub mod split;
pub mod types;
