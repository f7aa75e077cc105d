use std::collections::HashSet;

use crate::types::{Direction, Layer};

/// Gap at or below which two layers count as touching and move together
/// during a push, in timeline units.
pub const DEFAULT_MAX_GAP: f64 = 1.0;

/// Layers on the target's track that the proposed new bounds intrude on,
/// nearest intruder first.
///
/// For a left resize a candidate sat at or before the target's original
/// start and the new start now cuts into it; right is the mirror. The first
/// element is the seed for [`collect_push_group`].
pub fn find_overlapping(
    layers: &[Layer],
    target: &Layer,
    direction: Direction,
    new_start: f64,
    new_end: f64,
) -> Vec<Layer> {
    let mut hits: Vec<Layer> = layers
        .iter()
        .filter(|other| {
            if other.id == target.id || other.track_id != target.track_id {
                return false;
            }
            match direction {
                Direction::Left => other.end > new_start && other.end <= target.start,
                Direction::Right => other.start < new_end && other.start >= target.end,
            }
        })
        .cloned()
        .collect();

    match direction {
        Direction::Left => hits.sort_by(|a, b| b.end.total_cmp(&a.end)),
        Direction::Right => hits.sort_by(|a, b| a.start.total_cmp(&b.start)),
    }
    hits
}

/// The chain of layers that moves as a rigid block when `seed` is pushed in
/// `direction`.
///
/// Walks one nearest neighbor at a time while the gap to the chain boundary
/// stays within `max_gap`, so it terminates after at most one step per
/// same-track layer. The result includes `seed` and is sorted by start
/// ascending regardless of direction.
pub fn collect_push_group(
    layers: &[Layer],
    seed: &Layer,
    direction: Direction,
    max_gap: f64,
) -> Vec<Layer> {
    let same_track: Vec<&Layer> = layers
        .iter()
        .filter(|l| l.track_id == seed.track_id)
        .collect();

    let mut group: Vec<Layer> = vec![seed.clone()];
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(&seed.id);

    let mut current = seed.clone();
    loop {
        let next = match direction {
            Direction::Left => same_track
                .iter()
                .filter(|l| !visited.contains(l.id.as_str()) && l.end <= current.start)
                .max_by(|a, b| a.end.total_cmp(&b.end)),
            Direction::Right => same_track
                .iter()
                .filter(|l| !visited.contains(l.id.as_str()) && l.start >= current.end)
                .min_by(|a, b| a.start.total_cmp(&b.start)),
        };

        let Some(next) = next else { break };

        let gap = match direction {
            Direction::Left => current.start - next.end,
            Direction::Right => next.start - current.end,
        };
        if gap > max_gap {
            break;
        }

        visited.insert(&next.id);
        current = (*next).clone();
        group.push(current.clone());
    }

    group.sort_by(|a, b| a.start.total_cmp(&b.start));
    group
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
