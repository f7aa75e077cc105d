use crate::geometry::{overlaps, Bounds};
use crate::overlap::DEFAULT_MAX_GAP;
use crate::snapping::{collect_group_edges, find_snap_point};
use crate::types::Layer;

/// Overlap-resolution passes before giving up and keeping the last computed
/// position. Pathological arrangements can bounce a proposal back and forth
/// forever; the cap guarantees termination.
const MAX_ITER: usize = 10;

/// Optional drop behaviors. The defaults disable both, which leaves the
/// plain iterative clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DropOptions {
    /// Snap distance to push-group edges, in timeline units.
    pub snap_threshold: Option<f64>,
    /// Allowed shortfall when squeezing into an undersized gap, as a
    /// fraction of the dragged layer's duration.
    pub squeeze_tolerance: Option<f64>,
}

/// Resolved placement for a dragged layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub start: f64,
    pub end: f64,
}

/// Compute the final placement for `dragged` dropped at `raw_start` on
/// `track_id` (which may differ from its current track).
///
/// The layer's duration is preserved, except for a squeeze, which trades a
/// bounded amount of duration to exactly fill an undersized gap. Overlaps
/// are resolved by clamping to just before or just after the intruder,
/// pushed away from whichever side the proposal's midpoint already passed.
/// The result is clamped inside `bounds`, pinned against a boundary when it
/// cannot fit.
///
/// Pure and idempotent: identical inputs yield identical output, so live
/// previews can recompute it on every pointer move.
pub fn resolve_drop(
    layers: &[Layer],
    dragged: &Layer,
    track_id: &str,
    raw_start: f64,
    bounds: Bounds,
    options: DropOptions,
) -> Placement {
    let duration = dragged.end - dragged.start;

    let mut track_layers: Vec<&Layer> = layers
        .iter()
        .filter(|l| l.track_id == track_id && l.id != dragged.id)
        .collect();
    track_layers.sort_by(|a, b| a.start.total_cmp(&b.start));

    // Squeeze: when the proposal aims at a gap slightly too small for the
    // layer, take the gap exactly instead of bouncing out to one side.
    if let Some(tolerance) = options.squeeze_tolerance {
        let midpoint = raw_start + duration / 2.0;
        if let Some((gap_start, gap_end)) = gap_under(&track_layers, bounds, midpoint) {
            let width = gap_end - gap_start;
            if width < duration && duration - width <= tolerance * duration {
                return Placement {
                    start: gap_start,
                    end: gap_end,
                };
            }
        }
    }

    let mut proposed_start = raw_start;

    for _ in 0..MAX_ITER {
        let proposed_end = proposed_start + duration;
        let proposed_center = proposed_start + duration / 2.0;
        let mut adjusted = false;

        for other in &track_layers {
            if overlaps(proposed_start, proposed_end, other.start, other.end) {
                let other_center = (other.start + other.end) / 2.0;
                proposed_start = if proposed_center < other_center {
                    other.start - duration
                } else {
                    other.end
                };
                adjusted = true;
                break;
            }
        }

        if !adjusted {
            break;
        }
    }

    // Snap to a nearby push-group edge when the unclamped proposal is close
    // enough and the snapped interval still fits.
    if let Some(threshold) = options.snap_threshold {
        let edges = collect_group_edges(
            layers,
            track_id,
            Some(dragged.id.as_str()),
            DEFAULT_MAX_GAP,
            bounds.start,
        );
        // A layer can snap by either of its own edges.
        let mut candidates = edges.clone();
        candidates.extend(edges.iter().map(|edge| edge - duration));

        let snapped = find_snap_point(raw_start, &candidates, threshold);
        let fits = snapped >= bounds.start
            && snapped + duration <= bounds.end
            && track_layers
                .iter()
                .all(|l| !overlaps(snapped, snapped + duration, l.start, l.end));
        if fits {
            proposed_start = snapped;
        }
    }

    let mut clamped_start = proposed_start.max(bounds.start);
    let mut clamped_end = clamped_start + duration;

    if clamped_end > bounds.end {
        clamped_end = bounds.end;
        clamped_start = clamped_end - duration;
        if clamped_start < bounds.start {
            clamped_start = bounds.start;
            clamped_end = clamped_start + duration;
        }
    }

    Placement {
        start: clamped_start,
        end: clamped_end,
    }
}

/// The finite gap containing `position`: between consecutive layers, or
/// between a timeline boundary and the outermost layer. `track_layers` must
/// be sorted by start.
fn gap_under(track_layers: &[&Layer], bounds: Bounds, position: f64) -> Option<(f64, f64)> {
    let mut gap_start = bounds.start;

    for layer in track_layers {
        if layer.start > gap_start && position >= gap_start && position < layer.start {
            return Some((gap_start, layer.start));
        }
        gap_start = gap_start.max(layer.end);
    }

    if bounds.end.is_finite() && position >= gap_start && position < bounds.end {
        return Some((gap_start, bounds.end));
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayerContent;

    fn make_layer(id: &str, track_id: &str, start: f64, end: f64) -> Layer {
        Layer {
            id: id.to_string(),
            track_id: track_id.to_string(),
            start,
            end,
            content: LayerContent::Audio {
                url: format!("media/{id}.wav"),
            },
        }
    }

    fn placement_fits(layers: &[Layer], track_id: &str, placement: Placement) -> bool {
        layers
            .iter()
            .filter(|l| l.track_id == track_id)
            .all(|l| !overlaps(placement.start, placement.end, l.start, l.end))
    }

    // -----------------------------------------------------------------------
    // open track
    // -----------------------------------------------------------------------

    #[test]
    fn drop_on_empty_track_keeps_raw_position() {
        let dragged = make_layer("d", "t1", 0.0, 50.0);
        let layers = vec![dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t2",
            120.0,
            Bounds::unbounded(),
            DropOptions::default(),
        );
        assert_eq!(placement, Placement { start: 120.0, end: 170.0 });
    }

    #[test]
    fn duration_is_preserved() {
        let a = make_layer("a", "t1", 0.0, 100.0);
        let dragged = make_layer("d", "t1", 200.0, 250.0);
        let layers = vec![a, dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            80.0,
            Bounds::unbounded(),
            DropOptions::default(),
        );
        assert!((placement.end - placement.start - 50.0).abs() < 1e-9);
    }

    // -----------------------------------------------------------------------
    // overlap resolution
    // -----------------------------------------------------------------------

    #[test]
    fn midpoint_past_intruder_resolves_to_far_side() {
        // 50-unit layer proposed at 95 between [0,100) and [150,200): the
        // proposal's midpoint (120) is past the first layer's center, so it
        // lands just after it at 100.
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 150.0, 200.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            95.0,
            Bounds::unbounded(),
            DropOptions::default(),
        );
        assert_eq!(placement, Placement { start: 100.0, end: 150.0 });
        assert!(placement_fits(&layers[..2], "t1", placement));
    }

    #[test]
    fn midpoint_before_intruder_resolves_to_near_side() {
        let a = make_layer("a", "t1", 100.0, 200.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, dragged.clone()];

        // Midpoint 85 is before a's center (150): land just before at 50.
        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            60.0,
            Bounds::unbounded(),
            DropOptions::default(),
        );
        assert_eq!(placement, Placement { start: 50.0, end: 100.0 });
    }

    #[test]
    fn resolution_cascades_across_layers() {
        // A 60-unit proposal at 80 spans both a and b: the first pass lands
        // it after a, the second pushes it past b into free space.
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 100.0, 150.0);
        let dragged = make_layer("d", "t2", 0.0, 60.0);
        let layers = vec![a.clone(), b.clone(), dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            80.0,
            Bounds::unbounded(),
            DropOptions::default(),
        );
        assert_eq!(placement, Placement { start: 150.0, end: 210.0 });
        assert!(placement_fits(&[a, b], "t1", placement));
    }

    #[test]
    fn drop_is_idempotent() {
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 150.0, 200.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let options = DropOptions {
            snap_threshold: Some(8.0),
            squeeze_tolerance: Some(0.2),
        };
        let first = resolve_drop(&layers, &dragged, "t1", 97.0, Bounds::unbounded(), options);
        let second = resolve_drop(&layers, &dragged, "t1", 97.0, Bounds::unbounded(), options);
        assert_eq!(first, second);
    }

    #[test]
    fn pathological_bounce_terminates() {
        // No gap fits a 50-unit layer, and the bounds forbid escaping to
        // either side; the bounded loop must still return something.
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 110.0, 200.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            95.0,
            Bounds::new(0.0, 200.0),
            DropOptions::default(),
        );
        assert!((placement.end - placement.start - 50.0).abs() < 1e-9);
    }

    // -----------------------------------------------------------------------
    // bounds clamping
    // -----------------------------------------------------------------------

    #[test]
    fn clamped_to_timeline_start() {
        let dragged = make_layer("d", "t1", 0.0, 50.0);
        let layers = vec![dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            -30.0,
            Bounds::unbounded(),
            DropOptions::default(),
        );
        assert_eq!(placement, Placement { start: 0.0, end: 50.0 });
    }

    #[test]
    fn clamped_to_timeline_end() {
        let dragged = make_layer("d", "t1", 0.0, 50.0);
        let layers = vec![dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            280.0,
            Bounds::new(0.0, 300.0),
            DropOptions::default(),
        );
        assert_eq!(placement, Placement { start: 250.0, end: 300.0 });
    }

    #[test]
    fn oversized_layer_pinned_to_start() {
        // A 400-unit layer cannot fit a 300-unit timeline: pinned at the
        // start, end spilling past the bound.
        let dragged = make_layer("d", "t1", 0.0, 400.0);
        let layers = vec![dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            50.0,
            Bounds::new(0.0, 300.0),
            DropOptions::default(),
        );
        assert_eq!(placement, Placement { start: 0.0, end: 400.0 });
    }

    // -----------------------------------------------------------------------
    // group-edge snapping
    // -----------------------------------------------------------------------

    #[test]
    fn snaps_to_group_edge_within_threshold() {
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 210.0, 300.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let options = DropOptions {
            snap_threshold: Some(5.0),
            squeeze_tolerance: None,
        };
        let placement = resolve_drop(&layers, &dragged, "t1", 104.0, Bounds::unbounded(), options);
        assert_eq!(placement, Placement { start: 100.0, end: 150.0 });
    }

    #[test]
    fn snaps_trailing_edge_to_group_start() {
        let a = make_layer("a", "t1", 200.0, 300.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, dragged.clone()];

        // 147 is within threshold of 150 = group start minus duration.
        let options = DropOptions {
            snap_threshold: Some(5.0),
            squeeze_tolerance: None,
        };
        let placement = resolve_drop(&layers, &dragged, "t1", 147.0, Bounds::unbounded(), options);
        assert_eq!(placement, Placement { start: 150.0, end: 200.0 });
    }

    #[test]
    fn no_snap_beyond_threshold() {
        let a = make_layer("a", "t1", 0.0, 100.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, dragged.clone()];

        let options = DropOptions {
            snap_threshold: Some(5.0),
            squeeze_tolerance: None,
        };
        let placement = resolve_drop(&layers, &dragged, "t1", 120.0, Bounds::unbounded(), options);
        assert_eq!(placement, Placement { start: 120.0, end: 170.0 });
    }

    #[test]
    fn snap_skipped_when_it_would_overlap() {
        // 112 is within threshold of the candidate 110 (a's end minus
        // duration), but [110,160) sits on top of a; the snap is discarded
        // and the resolved position kept.
        let a = make_layer("a", "t1", 100.0, 160.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a.clone(), dragged.clone()];

        let options = DropOptions {
            snap_threshold: Some(5.0),
            squeeze_tolerance: None,
        };
        let placement = resolve_drop(&layers, &dragged, "t1", 112.0, Bounds::unbounded(), options);
        assert_eq!(placement, Placement { start: 160.0, end: 210.0 });
        assert!(placement_fits(&[a], "t1", placement));
    }

    // -----------------------------------------------------------------------
    // squeeze
    // -----------------------------------------------------------------------

    #[test]
    fn squeeze_fills_undersized_gap() {
        // A 50-unit layer aimed at a 45-unit gap: shortfall 5 is within 20%
        // tolerance, so the gap is filled exactly.
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 145.0, 250.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let options = DropOptions {
            snap_threshold: None,
            squeeze_tolerance: Some(0.2),
        };
        let placement = resolve_drop(&layers, &dragged, "t1", 98.0, Bounds::unbounded(), options);
        assert_eq!(placement, Placement { start: 100.0, end: 145.0 });
    }

    #[test]
    fn squeeze_rejects_gap_below_tolerance() {
        // A 30-unit gap for a 50-unit layer is a 40% shortfall: too much.
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 130.0, 250.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let options = DropOptions {
            snap_threshold: None,
            squeeze_tolerance: Some(0.2),
        };
        let placement = resolve_drop(&layers, &dragged, "t1", 98.0, Bounds::unbounded(), options);
        // Duration untouched: the undersized gap was not squeezed into.
        assert!((placement.end - placement.start - 50.0).abs() < 1e-9);
    }

    #[test]
    fn squeeze_ignores_gap_that_already_fits() {
        // A 60-unit gap fits the 50-unit layer; normal resolution applies
        // and the duration is untouched.
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 160.0, 250.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let options = DropOptions {
            snap_threshold: None,
            squeeze_tolerance: Some(0.2),
        };
        let placement = resolve_drop(&layers, &dragged, "t1", 105.0, Bounds::unbounded(), options);
        assert_eq!(placement, Placement { start: 105.0, end: 155.0 });
    }

    #[test]
    fn squeeze_disabled_by_default() {
        let a = make_layer("a", "t1", 0.0, 100.0);
        let b = make_layer("b", "t1", 145.0, 250.0);
        let dragged = make_layer("d", "t2", 0.0, 50.0);
        let layers = vec![a, b, dragged.clone()];

        let placement = resolve_drop(
            &layers,
            &dragged,
            "t1",
            98.0,
            Bounds::unbounded(),
            DropOptions::default(),
        );
        // Without squeeze the gap is never filled; the duration survives.
        assert!((placement.end - placement.start - 50.0).abs() < 1e-9);
        assert_ne!(placement, Placement { start: 100.0, end: 145.0 });
    }
}
