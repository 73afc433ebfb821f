// ============================================================================
// COLORED RANGES
// ============================================================================
//
// Colored value ranges and the arcs painted for them.
//
// Arc angles use the painter convention (degrees clockwise from the +x
// axis, y down), which is offset from the dial angles used by ticks and the
// needle. Both conventions are kept as separate constants.

use crate::config::{Color, GaugeConfig};
use crate::error::{GaugeError, Result};
use crate::ticks::DIAL_SWEEP;

/// Start of the base value track.
pub const BASE_ARC_START: f64 = 185.0;
/// Sweep of the base value track.
pub const BASE_ARC_SWEEP: f64 = 170.0;
/// Start of a range whose `begin` is zero.
pub const RANGE_ARC_ORIGIN: f64 = 190.0;
/// Overshoot allowed past either end of the labeled span, in dial degrees.
pub const RANGE_MARGIN_DEGREES: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredRange {
    pub color: Color,
    pub begin: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub color: Color,
}

/// Colored ranges in insertion order. Later entries paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSet {
    ranges: Vec<ColoredRange>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `[begin, end)` after clamping it to the dial span plus margin.
    ///
    /// Fails with [`GaugeError::InvalidRange`] when `begin >= end`; the set
    /// is left unchanged in that case.
    pub fn add(
        &mut self,
        begin: f64,
        end: f64,
        color: Color,
        max_value: f64,
    ) -> Result<ColoredRange> {
        if begin.is_nan() || end.is_nan() || begin >= end {
            return Err(GaugeError::InvalidRange { begin, end });
        }
        let margin = RANGE_MARGIN_DEGREES / DIAL_SWEEP;
        let (low, high) = (-margin * max_value, max_value * (margin + 1.0));
        // A range lying wholly outside the span collapses onto the nearest edge.
        let range = ColoredRange {
            color,
            begin: begin.max(low).min(high),
            end: end.min(high).max(low),
        };
        self.ranges.push(range);
        Ok(range)
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColoredRange> {
        self.ranges.iter()
    }
}

/// Base track arc followed by one arc per range, in insertion order.
pub fn composite_arcs(config: &GaugeConfig, ranges: &RangeSet) -> Vec<ArcSegment> {
    let max_value = config.max_value;
    let base = ArcSegment {
        start_angle: BASE_ARC_START,
        sweep_angle: BASE_ARC_SWEEP,
        color: config.default_color,
    };
    std::iter::once(base)
        .chain(ranges.iter().map(|range| ArcSegment {
            start_angle: RANGE_ARC_ORIGIN + range.begin / max_value * DIAL_SWEEP,
            sweep_angle: (range.end - range.begin) / max_value * DIAL_SWEEP,
            color: range.color,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: Color = Color::new(0xff, 0, 0);
    const GREEN: Color = Color::new(0, 0xff, 0);
    const GREY: Color = crate::config::DEFAULT_COLOR;

    #[test]
    fn overshooting_bounds_are_clamped_to_the_margin() {
        let mut ranges = RangeSet::new();
        let stored = ranges.add(-10.0, 110.0, RED, 100.0).expect("valid range");
        assert_eq!(stored.begin, -3.125);
        assert_eq!(stored.end, 103.125);
    }

    #[test]
    fn inverted_or_empty_ranges_are_rejected() {
        let mut ranges = RangeSet::new();
        ranges.add(10.0, 20.0, RED, 100.0).expect("valid range");

        assert_eq!(
            ranges.add(50.0, 50.0, GREEN, 100.0),
            Err(GaugeError::InvalidRange {
                begin: 50.0,
                end: 50.0
            })
        );
        assert!(ranges.add(60.0, 40.0, GREEN, 100.0).is_err());
        assert!(ranges.add(f64::NAN, 40.0, GREEN, 100.0).is_err());
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn arcs_follow_insertion_order_without_merging() {
        let mut ranges = RangeSet::new();
        ranges.add(50.0, 100.0, RED, 100.0).expect("valid range");
        ranges.add(0.0, 75.0, GREEN, 100.0).expect("valid range");

        let arcs = composite_arcs(&GaugeConfig::default(), &ranges);
        assert_eq!(arcs.len(), 3);
        assert_eq!(
            arcs[1],
            ArcSegment {
                start_angle: 270.0,
                sweep_angle: 80.0,
                color: RED
            }
        );
        assert_eq!(
            arcs[2],
            ArcSegment {
                start_angle: 190.0,
                sweep_angle: 120.0,
                color: GREEN
            }
        );
    }

    #[test]
    fn cleared_set_composites_to_the_base_track_only() {
        let mut ranges = RangeSet::new();
        ranges.add(10.0, 20.0, RED, 100.0).expect("valid range");
        ranges.clear();

        let arcs = composite_arcs(&GaugeConfig::default(), &ranges);
        assert_eq!(
            arcs,
            vec![ArcSegment {
                start_angle: 185.0,
                sweep_angle: 170.0,
                color: GREY
            }]
        );
    }

    #[test]
    fn full_clamped_range_matches_the_base_track() {
        let mut ranges = RangeSet::new();
        ranges.add(-1000.0, 1000.0, RED, 100.0).expect("valid range");
        let arcs = composite_arcs(&GaugeConfig::default(), &ranges);
        assert!((arcs[1].start_angle - BASE_ARC_START).abs() < 1e-9);
        assert!((arcs[1].sweep_angle - BASE_ARC_SWEEP).abs() < 1e-9);
    }

    #[test]
    fn ranges_past_the_dial_collapse_to_an_empty_arc() {
        let mut ranges = RangeSet::new();
        let stored = ranges.add(200.0, 300.0, RED, 100.0).expect("valid range");
        assert_eq!(stored.begin, stored.end);
        let arcs = composite_arcs(&GaugeConfig::default(), &ranges);
        assert_eq!(arcs[1].sweep_angle, 0.0);
    }

    proptest! {
        #[test]
        fn prop_stored_ranges_stay_within_margin(begin in -500.0f64..500.0, len in 0.001f64..500.0, max in 1.0f64..500.0) {
            let mut ranges = RangeSet::new();
            let stored = ranges.add(begin, begin + len, RED, max).unwrap();
            prop_assert!(stored.begin >= -max * 5.0 / 160.0 - 1e-9);
            prop_assert!(stored.end <= max * (1.0 + 5.0 / 160.0) + 1e-9);
            prop_assert!(stored.begin <= stored.end);
        }
    }
}
