use crate::types::Layer;

/// Cut `layer` into two contiguous halves at `split_time`.
///
/// Both halves keep the track and the full payload; ids derive from the
/// original with `-a`/`-b` suffixes so a split is reproducible. Assumes
/// `layer.start < split_time < layer.end`; [`crate::types::Timeline`]'s
/// `split_layer` validates before calling, the operator itself does not
/// clamp.
pub fn split(layer: &Layer, split_time: f64) -> (Layer, Layer) {
    let left = Layer {
        id: format!("{}-a", layer.id),
        track_id: layer.track_id.clone(),
        start: layer.start,
        end: split_time,
        content: layer.content.clone(),
    };
    let right = Layer {
        id: format!("{}-b", layer.id),
        track_id: layer.track_id.clone(),
        start: split_time,
        end: layer.end,
        content: layer.content.clone(),
    };
    (left, right)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
