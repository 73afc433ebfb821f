// ============================================================================
// RETAINED MODE SCENE
// ============================================================================

use tracing::trace;

use crate::config::{
    Color, GaugeConfig, INNER_LAYER, MASK_LAYER, OUTER_LAYER, PIVOT_LAYER, RANGE_LAYER,
};
use crate::geometry::{resolve_oval, LineSegment, Oval, Point, Surface};
use crate::needle::{project_needle, PIVOT_CAP_START, PIVOT_CAP_SWEEP};
use crate::ranges::{composite_arcs, RangeSet};
use crate::ticks::layout_ticks;

/// How an arc is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcPaint {
    /// Filled wedge between the arc and the center.
    Fill(Color),
    /// Outline along the circle only.
    Stroke { color: Color, thickness: f32 },
}

/// One drawing primitive. Arc angles are degrees clockwise from the +x axis
/// with y pointing down.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Arc {
        oval: Oval,
        start_angle: f64,
        sweep_angle: f64,
        paint: ArcPaint,
    },
    Line {
        segment: LineSegment,
        thickness: f32,
        color: Color,
    },
    Text {
        text: String,
        anchor: Point,
        rotation_degrees: f64,
        font_size: f32,
        color: Color,
    },
    /// Rectangle reserved for the host's center mask bitmap.
    Mask {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        tint: Option<Color>,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl IntoIterator for Scene {
    type Item = DrawCommand;
    type IntoIter = std::vec::IntoIter<DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

/// Builds the frame for `value` on `surface`.
///
/// Order: background wedge, inner wedge, center mask, ticks with their
/// labels, value track and ranges, needle, pivot cap.
pub fn compose(config: &GaugeConfig, ranges: &RangeSet, value: f64, surface: &Surface) -> Scene {
    let style = &config.style;
    let mut scene = Scene::new();

    let oval = resolve_oval(surface, OUTER_LAYER);
    add_half_disc(&mut scene, oval, style.background_color);
    add_half_disc(
        &mut scene,
        resolve_oval(surface, INNER_LAYER),
        style.inner_color,
    );

    let mask_size = oval.width() * MASK_LAYER;
    scene.add_command(DrawCommand::Mask {
        x: oval.center_x - mask_size / 2.0,
        y: oval.center_y - mask_size / 2.0,
        width: mask_size,
        height: mask_size / 2.0,
        tint: style.mask_color,
    });

    for tick in layout_ticks(config, &oval) {
        scene.add_command(DrawCommand::Line {
            segment: tick.segment,
            thickness: style.tick_thickness,
            color: config.default_color,
        });
        if let Some(label) = tick.label {
            scene.add_command(DrawCommand::Text {
                text: label.text,
                anchor: label.anchor,
                rotation_degrees: label.rotation_degrees,
                font_size: config.label_text_size,
                color: style.text_color,
            });
        }
    }

    let track = resolve_oval(surface, RANGE_LAYER);
    for arc in composite_arcs(config, ranges) {
        scene.add_command(DrawCommand::Arc {
            oval: track,
            start_angle: arc.start_angle,
            sweep_angle: arc.sweep_angle,
            paint: ArcPaint::Stroke {
                color: arc.color,
                thickness: style.range_thickness,
            },
        });
    }

    let pivot = resolve_oval(surface, PIVOT_LAYER);
    scene.add_command(DrawCommand::Line {
        segment: project_needle(value, config.max_value, &oval, &pivot),
        thickness: style.needle_thickness,
        color: style.needle_color,
    });
    add_half_disc(&mut scene, pivot, style.background_color);

    trace!(commands = scene.len(), value, "scene composed");
    scene
}

fn add_half_disc(scene: &mut Scene, oval: Oval, color: Color) {
    scene.add_command(DrawCommand::Arc {
        oval,
        start_angle: PIVOT_CAP_START,
        sweep_angle: PIVOT_CAP_SWEEP,
        paint: ArcPaint::Fill(color),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelFormatter;
    use crate::geometry::Padding;

    fn surface() -> Surface {
        Surface::new(400.0, 200.0, Padding::default())
    }

    fn kinds(scene: &Scene) -> Vec<&'static str> {
        scene
            .commands()
            .iter()
            .map(|c| match c {
                DrawCommand::Arc {
                    paint: ArcPaint::Fill(_),
                    ..
                } => "fill",
                DrawCommand::Arc { .. } => "stroke",
                DrawCommand::Line { .. } => "line",
                DrawCommand::Text { .. } => "text",
                DrawCommand::Mask { .. } => "mask",
            })
            .collect()
    }

    #[test]
    fn primitives_follow_the_painting_order() {
        let config = GaugeConfig::builder().minor_ticks_per_major(0).build();
        let scene = compose(&config, &RangeSet::new(), 0.0, &surface());
        assert_eq!(
            kinds(&scene),
            vec![
                "fill", "fill", "mask", "line", "line", "line", "line", "line", "line", "stroke",
                "line", "fill"
            ]
        );
    }

    #[test]
    fn labels_follow_their_tick() {
        let config = GaugeConfig::builder()
            .minor_ticks_per_major(0)
            .major_step(100.0)
            .label_formatter(LabelFormatter::integer())
            .build();
        let scene = compose(&config, &RangeSet::new(), 0.0, &surface());
        let texts: Vec<&str> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["0", "100"]);
        assert_eq!(kinds(&scene)[3..7], ["line", "text", "line", "text"]);
    }

    #[test]
    fn ranges_paint_after_the_base_track() {
        let config = GaugeConfig::default();
        let mut ranges = RangeSet::new();
        let red = Color::new(0xff, 0, 0);
        ranges
            .add(80.0, 100.0, red, config.max_value)
            .expect("valid range");
        let scene = compose(&config, &ranges, 0.0, &surface());

        let strokes: Vec<Color> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Arc {
                    paint: ArcPaint::Stroke { color, .. },
                    ..
                } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(strokes, vec![config.default_color, red]);
    }

    #[test]
    fn mask_covers_the_upper_half_of_the_enlarged_oval() {
        let scene = compose(&GaugeConfig::default(), &RangeSet::new(), 0.0, &surface());
        match &scene.commands()[2] {
            DrawCommand::Mask {
                x,
                y,
                width,
                height,
                tint,
            } => {
                assert!((width - 440.0).abs() < 1e-9);
                assert!((height - 220.0).abs() < 1e-9);
                assert!((x + 20.0).abs() < 1e-9);
                assert!((y + 20.0).abs() < 1e-9);
                assert_eq!(*tint, None);
            }
            other => panic!("expected mask, got {other:?}"),
        }
    }
}
