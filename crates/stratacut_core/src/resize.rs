use crate::geometry::{Bounds, MIN_LAYER_WIDTH};
use crate::overlap::{collect_push_group, find_overlapping, DEFAULT_MAX_GAP};
use crate::types::{Direction, Layer};

/// Apply a one-sided resize to `target`, pushing or proportionally shrinking
/// neighboring layers so everything stays within `bounds`.
///
/// Out-of-range proposals are clamped rather than rejected: the moved edge
/// never crosses the timeline start/end and never leaves the layer thinner
/// than [`MIN_LAYER_WIDTH`]. When the proposal cuts into a neighboring
/// chain, the chain is shifted by the overlap amount if there is room
/// between it and the timeline boundary, otherwise the whole chain is
/// shrunk to the available width (relative widths preserved, each at least
/// [`MIN_LAYER_WIDTH`]) and packed against the boundary.
///
/// Returns the full updated layer collection; the input is never mutated.
pub fn resize(
    layers: &[Layer],
    target: &Layer,
    new_start: f64,
    new_end: f64,
    direction: Direction,
    bounds: Bounds,
) -> Vec<Layer> {
    let mut updated: Vec<Layer> = layers.to_vec();
    let Some(index) = updated.iter().position(|l| l.id == target.id) else {
        return updated;
    };

    let mut resized = target.clone();

    match direction {
        Direction::Left => {
            let mut target_start = new_start;
            if target_start < bounds.start {
                target_start = bounds.start;
            }
            if target_start >= target.end {
                target_start = target.end - MIN_LAYER_WIDTH;
            }
            resized.start = target_start;

            let overlapping =
                find_overlapping(&updated, target, Direction::Left, target_start, resized.end);

            if let Some(intruder) = overlapping.first() {
                let group =
                    collect_push_group(&updated, intruder, Direction::Left, DEFAULT_MAX_GAP);
                let overlap_amount = intruder.end - target_start;
                let min_start = group.iter().map(|l| l.start).fold(f64::INFINITY, f64::min);

                if min_start - overlap_amount < bounds.start {
                    // No room to push: shrink the group to fit between the
                    // timeline start and the resized edge.
                    let total_width: f64 = group.iter().map(Layer::width).sum();
                    let available_width = resized.start - bounds.start;
                    let scale_factor = available_width / total_width;

                    let mut cursor = bounds.start;
                    for member in &group {
                        let new_width = (member.width() * scale_factor).max(MIN_LAYER_WIDTH);
                        set_layer_bounds(&mut updated, &member.id, cursor, cursor + new_width);
                        cursor += new_width;
                    }

                    // The intruder packs last; pin the resized start to its
                    // new end (min-width clamps can leave it past the
                    // requested start).
                    resized.start = cursor;
                } else {
                    for member in &group {
                        let shifted_start = member.start - overlap_amount;
                        let mut shifted_end = member.end - overlap_amount;
                        if shifted_end - shifted_start < MIN_LAYER_WIDTH {
                            shifted_end = shifted_start + MIN_LAYER_WIDTH;
                        }
                        set_layer_bounds(&mut updated, &member.id, shifted_start, shifted_end);
                    }
                }
            }
        }
        Direction::Right => {
            let mut target_end = new_end;
            if target_end > bounds.end {
                target_end = bounds.end;
            }
            if target_end <= target.start {
                target_end = target.start + MIN_LAYER_WIDTH;
            }
            resized.end = target_end;

            let overlapping =
                find_overlapping(&updated, target, Direction::Right, resized.start, target_end);

            if let Some(intruder) = overlapping.first() {
                let group =
                    collect_push_group(&updated, intruder, Direction::Right, DEFAULT_MAX_GAP);
                let overlap_amount = target_end - intruder.start;
                let max_end = group.iter().map(|l| l.end).fold(f64::NEG_INFINITY, f64::max);

                if max_end + overlap_amount > bounds.end {
                    // No room to push: shrink the group to fit between the
                    // resized edge and the timeline end.
                    let total_width: f64 = group.iter().map(Layer::width).sum();
                    let available_width = bounds.end - resized.end;
                    let scale_factor = available_width / total_width;

                    let mut cursor = resized.end;
                    for member in &group {
                        let new_width = (member.width() * scale_factor).max(MIN_LAYER_WIDTH);
                        set_layer_bounds(&mut updated, &member.id, cursor, cursor + new_width);
                        cursor += new_width;
                    }
                } else {
                    for member in &group {
                        let shifted_start = member.start + overlap_amount;
                        let mut shifted_end = member.end + overlap_amount;
                        if shifted_end - shifted_start < MIN_LAYER_WIDTH {
                            shifted_end = shifted_start + MIN_LAYER_WIDTH;
                        }
                        set_layer_bounds(&mut updated, &member.id, shifted_start, shifted_end);
                    }
                }
            }
        }
    }

    updated[index] = resized;
    updated
}

/// Set the bounds of the layer with `id`, if present.
fn set_layer_bounds(layers: &mut [Layer], id: &str, start: f64, end: f64) {
    if let Some(layer) = layers.iter_mut().find(|l| l.id == id) {
        layer.start = start;
        layer.end = end;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
