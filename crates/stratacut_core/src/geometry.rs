//! Interval math shared by the arrangement engine.

/// Minimum committed width of a layer, in timeline units.
pub const MIN_LAYER_WIDTH: f64 = 1.0;

/// Half-open interval overlap test. Two intervals `[a_start, a_end)` and
/// `[b_start, b_end)` overlap iff each starts before the other ends;
/// touching edges do not overlap.
pub fn overlaps(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && a_end > b_start
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// The usable extent of the timeline in timeline units. `end` is
/// `f64::INFINITY` while the timeline width is unknown, in which case no
/// right-bound clamping happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub start: f64,
    pub end: f64,
}

impl Bounds {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self {
            start: 0.0,
            end: f64::INFINITY,
        }
    }

    /// Convert a pixel-space timeline width into unit-space bounds.
    /// `scale` is pixels per timeline unit.
    pub fn from_width(timeline_width_px: f64, scale: f64) -> Self {
        Self {
            start: 0.0,
            end: timeline_width_px / scale,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_intervals_detected() {
        assert!(overlaps(0.0, 10.0, 5.0, 15.0));
        assert!(overlaps(5.0, 15.0, 0.0, 10.0));
        assert!(overlaps(0.0, 10.0, 2.0, 8.0));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        assert!(!overlaps(0.0, 10.0, 10.0, 20.0));
        assert!(!overlaps(10.0, 20.0, 0.0, 10.0));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(0.0, 10.0, 20.0, 30.0));
    }

    #[test]
    fn clamp_within_range() {
        assert!((clamp(5.0, 0.0, 10.0) - 5.0).abs() < f64::EPSILON);
        assert!((clamp(-1.0, 0.0, 10.0) - 0.0).abs() < f64::EPSILON);
        assert!((clamp(11.0, 0.0, 10.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds_from_width_converts_pixels() {
        // 1200px wide timeline at 2px per unit holds 600 units.
        let bounds = Bounds::from_width(1200.0, 2.0);
        assert!((bounds.start - 0.0).abs() < f64::EPSILON);
        assert!((bounds.end - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unbounded_has_infinite_end() {
        let bounds = Bounds::unbounded();
        assert!(bounds.end.is_infinite());
        assert_eq!(bounds, Bounds::default());
    }
}
