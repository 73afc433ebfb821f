// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================
//
// Paints a composed `Scene` into an RGBA8 frame such as the one handed out
// by `pixels`. Coverage is anti-aliased against the existing frame content.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::{GaugeError, Result};
use crate::geometry::{LineSegment, Oval, Point};
use crate::scene::{ArcPaint, DrawCommand, Scene};

/// Mutable view over an RGBA8 frame buffer.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Wraps `frame`, which must hold `width * height` RGBA pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// RGBA value at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, value) in src.iter().enumerate() {
            let dst = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (value * a + dst * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }
}

/// Parses TrueType/OpenType bytes for label rendering.
pub fn load_font(data: Vec<u8>) -> Result<Font<'static>> {
    Font::try_from_vec(data).ok_or(GaugeError::InvalidFont)
}

/// Paints every command of `scene` in order. Text is skipped without a font.
pub fn paint_scene(canvas: &mut Canvas, scene: &Scene, font: Option<&Font>) {
    for command in scene.commands() {
        match command {
            DrawCommand::Arc {
                oval,
                start_angle,
                sweep_angle,
                paint,
            } => draw_arc(canvas, oval, *start_angle, *sweep_angle, *paint),
            DrawCommand::Line {
                segment,
                thickness,
                color,
            } => draw_thick_line_aa(canvas, segment, *thickness, *color),
            DrawCommand::Text {
                text,
                anchor,
                rotation_degrees,
                font_size,
                color,
            } => {
                if let Some(font) = font {
                    draw_rotated_text(
                        canvas,
                        font,
                        text,
                        *anchor,
                        *rotation_degrees,
                        Scale::uniform(*font_size),
                        *color,
                    );
                }
            }
            DrawCommand::Mask {
                x,
                y,
                width,
                height,
                tint,
            } => {
                if let Some(tint) = tint {
                    let ring = Oval {
                        center_x: x + width / 2.0,
                        center_y: y + height,
                        radius: width / 2.0,
                    };
                    draw_arc(
                        canvas,
                        &ring,
                        180.0,
                        180.0,
                        ArcPaint::Stroke {
                            color: *tint,
                            thickness: 3.0,
                        },
                    );
                }
            }
        }
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_thick_line_aa(canvas: &mut Canvas, segment: &LineSegment, thickness: f32, color: Color) {
    let half = f64::from(thickness) / 2.0;
    let pad = half.ceil() + 1.0;
    let min_x = (segment.x1.min(segment.x2) - pad).floor() as i64;
    let max_x = (segment.x1.max(segment.x2) + pad).ceil() as i64;
    let min_y = (segment.y1.min(segment.y2) - pad).floor() as i64;
    let max_y = (segment.y1.max(segment.y2) + pad).ceil() as i64;
    let dx = segment.x2 - segment.x1;
    let dy = segment.y2 - segment.y1;
    let len_sq = dx * dx + dy * dy;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 - segment.x1;
            let py = y as f64 - segment.y1;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = (px - t * dx).hypot(py - t * dy);
            let aa = 1.0 - (dist - half).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

// Painter angles: degrees clockwise from +x, y down.
fn in_sweep(angle: f64, start: f64, sweep: f64) -> bool {
    sweep >= 360.0 || (angle - start).rem_euclid(360.0) <= sweep
}

fn draw_arc(
    canvas: &mut Canvas,
    oval: &Oval,
    start_angle: f64,
    sweep_angle: f64,
    paint: ArcPaint,
) {
    let (start, sweep) = if sweep_angle < 0.0 {
        (start_angle + sweep_angle, -sweep_angle)
    } else {
        (start_angle, sweep_angle)
    };
    if sweep <= 0.0 || oval.radius <= 0.0 {
        return;
    }

    let half_stroke = match paint {
        ArcPaint::Stroke { thickness, .. } => f64::from(thickness) / 2.0,
        ArcPaint::Fill(_) => 0.0,
    };
    let reach = oval.radius + half_stroke + 1.0;
    let min_x = (oval.center_x - reach).floor().max(0.0) as i64;
    let max_x = (oval.center_x + reach).ceil().min(canvas.width as f64) as i64;
    let min_y = (oval.center_y - reach).floor().max(0.0) as i64;
    let max_y = (oval.center_y + reach).ceil().min(canvas.height as f64) as i64;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f64 - oval.center_x;
            let dy = y as f64 - oval.center_y;
            let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
            if !in_sweep(angle, start, sweep) {
                continue;
            }
            let dist = dx.hypot(dy);
            let (color, aa) = match paint {
                ArcPaint::Fill(color) => (color, 1.0 - (dist - oval.radius).clamp(0.0, 1.0)),
                ArcPaint::Stroke { color, .. } => (
                    color,
                    1.0 - ((dist - oval.radius).abs() - half_stroke).clamp(0.0, 1.0),
                ),
            };
            if aa > 0.0 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_rotated_text(
    canvas: &mut Canvas,
    font: &Font,
    text: &str,
    anchor: Point,
    rotation_degrees: f64,
    scale: Scale,
    color: Color,
) {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let Some(last) = glyphs.last() else {
        return;
    };
    let advance =
        f64::from(last.position().x + last.unpositioned().h_metrics().advance_width);
    let (sin_r, cos_r) = rotation_degrees.to_radians().sin_cos();

    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            if v > 0.001 {
                // Centered horizontally, baseline on the anchor
                let local_x = f64::from(bb.min.x + gx as i32) - advance / 2.0;
                let local_y = f64::from(bb.min.y + gy as i32);
                let x = anchor.x + local_x * cos_r - local_y * sin_r;
                let y = anchor.y + local_x * sin_r + local_y * cos_r;
                draw_antialiased_pixel(canvas, x, y, color, v);
            }
        });
    }
}

fn draw_antialiased_pixel(canvas: &mut Canvas, x: f64, y: f64, color: Color, alpha: f32) {
    let x_floor = x.floor();
    let y_floor = y.floor();
    let x_frac = x - x_floor;
    let y_frac = y - y_floor;
    let (x0, y0) = (x_floor as i64, y_floor as i64);

    let samples = [
        (x0, y0, (1.0 - x_frac) * (1.0 - y_frac)),
        (x0 + 1, y0, x_frac * (1.0 - y_frac)),
        (x0, y0 + 1, (1.0 - x_frac) * y_frac),
        (x0 + 1, y0 + 1, x_frac * y_frac),
    ];
    for (px, py, weight) in samples {
        let final_alpha = alpha * weight as f32;
        if final_alpha > 0.001 {
            canvas.blend(px, py, color, final_alpha);
        }
    }
}
