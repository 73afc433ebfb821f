// ============================================================================
// NEEDLE
// ============================================================================
//
// Needle placement for the current value.

use crate::config::{NEEDLE_OVERHANG, TICK_RING_FACTOR};
use crate::geometry::{LineSegment, Oval};
use crate::ticks::{DIAL_START_ANGLE, DIAL_SWEEP};

/// Painter-convention start and sweep of the half-disc cap over the pivot.
pub const PIVOT_CAP_START: f64 = 180.0;
pub const PIVOT_CAP_SWEEP: f64 = 180.0;

/// Dial angle of `value`, same convention as the ticks.
pub fn needle_angle(value: f64, max_value: f64) -> f64 {
    DIAL_START_ANGLE + value / max_value * DIAL_SWEEP
}

/// Needle from the rim of the pivot circle to just past the tick ring.
pub fn project_needle(value: f64, max_value: f64, oval: &Oval, pivot: &Oval) -> LineSegment {
    let angle = needle_angle(value, max_value);
    let reach = oval.width() * TICK_RING_FACTOR + NEEDLE_OVERHANG;
    oval.radial_segment(angle, pivot.width() * 0.5, reach)
}
