// ============================================================================
// TICK LAYOUT
// ============================================================================
//
// Major/minor graduation layout along the 160° dial sweep.

use crate::config::{
    GaugeConfig, LABEL_GAP, MAJOR_TICK_LENGTH, MINOR_TICK_LENGTH, TICK_RING_FACTOR,
};
use crate::geometry::{LineSegment, Oval, Point};

/// Dial angle of the zero graduation.
pub const DIAL_START_ANGLE: f64 = 10.0;
/// Dial angle of the last possible graduation.
pub const DIAL_END_ANGLE: f64 = 170.0;
/// Angular sweep used by the value range.
pub const DIAL_SWEEP: f64 = DIAL_END_ANGLE - DIAL_START_ANGLE;

/// Upper bound on graduations emitted for one dial. Layout stops once it
/// is reached, so extreme step ratios cannot exhaust memory.
pub const MAX_TICKS: usize = 1024;

// Absorbs drift when the step does not divide the sweep exactly.
const ANGLE_EPSILON: f64 = 1e-9;

/// Text drawn next to a major tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub text: String,
    /// Baseline center of the text.
    pub anchor: Point,
    /// Clockwise screen rotation applied around `anchor`.
    pub rotation_degrees: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub angle_degrees: f64,
    pub progress: f64,
    pub is_major: bool,
    pub segment: LineSegment,
    pub label: Option<TickLabel>,
}

/// Angular distance between two major ticks.
pub fn major_angle_step(config: &GaugeConfig) -> f64 {
    config.major_step / config.max_value * DIAL_SWEEP
}

/// Lays out every graduation of the dial around `oval`.
///
/// Majors start at 10° and advance by [`major_angle_step`] while they stay
/// within 170°. Each major is followed by its interior minors; a minor at or
/// beyond `170° + minor_step / 2` ends the run. At most [`MAX_TICKS`]
/// graduations are returned.
pub fn layout_ticks(config: &GaugeConfig, oval: &Oval) -> Vec<Tick> {
    let major_step = major_angle_step(config);
    let subdivisions = f64::from(config.minor_ticks_per_major) + 1.0;
    let minor_step = major_step / subdivisions;
    let radius = oval.width() * TICK_RING_FACTOR;

    let mut ticks = Vec::new();
    let mut index = 0u32;
    while ticks.len() < MAX_TICKS {
        let angle = DIAL_START_ANGLE + f64::from(index) * major_step;
        if angle > DIAL_END_ANGLE + ANGLE_EPSILON {
            break;
        }
        let progress = f64::from(index) * config.major_step;

        ticks.push(Tick {
            angle_degrees: angle,
            progress,
            is_major: true,
            segment: oval.radial_segment(
                angle,
                radius - MAJOR_TICK_LENGTH / 2.0,
                radius + MAJOR_TICK_LENGTH / 2.0,
            ),
            label: config.label_formatter.as_ref().map(|formatter| {
                label_for(
                    oval,
                    angle,
                    radius,
                    formatter.label_for(progress, config.max_value),
                )
            }),
        });

        for i in 1..=config.minor_ticks_per_major {
            let minor_angle = angle + f64::from(i) * minor_step;
            if ticks.len() >= MAX_TICKS || minor_angle >= DIAL_END_ANGLE + minor_step / 2.0 {
                break;
            }
            ticks.push(Tick {
                angle_degrees: minor_angle,
                progress: progress + config.major_step * f64::from(i) / subdivisions,
                is_major: false,
                segment: oval.radial_segment(minor_angle, radius, radius + MINOR_TICK_LENGTH),
                label: None,
            });
        }

        index += 1;
    }
    ticks
}

// The canvas is turned by 180° + angle around the center, the text is
// placed on the horizontal ray, then turned another 90° about its anchor.
fn label_for(oval: &Oval, angle: f64, radius: f64, text: String) -> TickLabel {
    let distance = radius + MAJOR_TICK_LENGTH / 2.0 + LABEL_GAP;
    TickLabel {
        text,
        anchor: oval.point_at(angle, distance),
        rotation_degrees: (180.0 + angle + 90.0).rem_euclid(360.0),
    }
}
