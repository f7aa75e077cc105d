use crate::types::Layer;

/// Find the nearest snap point within the threshold.
/// Returns the snapped position if within threshold, otherwise the original
/// position.
pub fn find_snap_point(position: f64, snap_points: &[f64], threshold: f64) -> f64 {
    let mut best = position;
    let mut best_dist = f64::INFINITY;

    for &point in snap_points {
        let dist = (position - point).abs();
        if dist < best_dist {
            best = point;
            best_dist = dist;
        }
    }

    if best_dist <= threshold {
        best
    } else {
        position
    }
}

/// Boundaries of every push-group on a track: the outer edges of each
/// maximal chain of abutting layers (gap <= `max_gap`), plus the timeline
/// origin. Sorted and deduplicated.
pub fn collect_group_edges(
    layers: &[Layer],
    track_id: &str,
    exclude_id: Option<&str>,
    max_gap: f64,
    origin: f64,
) -> Vec<f64> {
    let mut same_track: Vec<&Layer> = layers
        .iter()
        .filter(|l| l.track_id == track_id && Some(l.id.as_str()) != exclude_id)
        .collect();
    same_track.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut points = vec![origin];

    let mut i = 0;
    while i < same_track.len() {
        let chain_start = same_track[i].start;
        let mut chain_end = same_track[i].end;
        let mut j = i + 1;
        while j < same_track.len() && same_track[j].start - chain_end <= max_gap {
            chain_end = chain_end.max(same_track[j].end);
            j += 1;
        }
        points.push(chain_start);
        points.push(chain_end);
        i = j;
    }

    points.sort_by(|a, b| a.total_cmp(b));
    points.dedup();
    points
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
