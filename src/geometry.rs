// ============================================================================
// GEOMETRY
// ============================================================================
//
// Bounding-circle resolution and size negotiation.
//
// The gauge is the top half of a circle. Every concentric layer is laid out
// inside an `Oval` resolved from the drawable rectangle and a per-layer
// scale factor.

/// Inner spacing between the surface edge and the drawable rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Padding {
    pub const fn uniform(p: f64) -> Self {
        Self {
            left: p,
            top: p,
            right: p,
            bottom: p,
        }
    }
}

/// The host surface a frame is rendered into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Surface {
    pub fn new(width: f64, height: f64, padding: Padding) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn draw_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    pub fn draw_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    pub fn between(from: Point, to: Point) -> Self {
        Self {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
        }
    }

    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }
}

/// Bounding circle of one gauge layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oval {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Oval {
    pub fn width(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn left(&self) -> f64 {
        self.center_x - self.radius
    }

    pub fn top(&self) -> f64 {
        self.center_y - self.radius
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Point at `radius` from the center along a dial angle.
    ///
    /// x mirrors through `180 - angle` while y uses `angle` directly, so
    /// angle 0 lands on the left horizon and 90 straight above the center.
    pub fn point_at(&self, angle_degrees: f64, radius: f64) -> Point {
        Point::new(
            self.center_x + (180.0 - angle_degrees).to_radians().cos() * radius,
            self.center_y - angle_degrees.to_radians().sin() * radius,
        )
    }

    /// Radial segment between two distances from the center.
    pub fn radial_segment(&self, angle_degrees: f64, inner: f64, outer: f64) -> LineSegment {
        LineSegment::between(
            self.point_at(angle_degrees, inner),
            self.point_at(angle_degrees, outer),
        )
    }
}

/// Resolves the circle of one layer inside the drawable area of `surface`.
///
/// The half-disc needs twice the drawable height, so the circle is
/// width-bound when `2 * draw_height >= draw_width` and height-bound
/// otherwise. The equator sits on the bottom edge of the drawable area.
pub fn resolve_oval(surface: &Surface, scale: f64) -> Oval {
    let draw_width = surface.draw_width();
    let draw_height = surface.draw_height();

    let diameter = if draw_height * 2.0 >= draw_width {
        draw_width * scale
    } else {
        draw_height * 2.0 * scale
    };

    // Centering the diameter in (draw_width, 2 * draw_height) puts the
    // center at half the width and at the full height.
    Oval {
        center_x: surface.padding.left + draw_width / 2.0,
        center_y: surface.padding.top + draw_height,
        radius: diameter / 2.0,
    }
}

// ============================================================================
// SIZE NEGOTIATION
// ============================================================================

/// Size limits offered by the host; `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Constraints {
    pub const fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub const fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub const fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Negotiates a 2:1 size from the host constraints.
///
/// With both dimensions offered the width is capped by the offered height
/// before the height is derived from it.
pub fn measure(constraints: Constraints) -> Size {
    let (width, height) = match (constraints.width, constraints.height) {
        (Some(w), Some(h)) => {
            let width = h.min(w);
            (width, width / 2)
        }
        (Some(w), None) => (w, w / 2),
        (None, Some(h)) => (h.saturating_mul(2), h),
        (None, None) => (0, 0),
    };
    Size { width, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn surface(width: f64, height: f64) -> Surface {
        Surface::new(width, height, Padding::default())
    }

    #[test]
    fn wide_surface_is_height_bound() {
        let oval = resolve_oval(&surface(200.0, 50.0), 1.0);
        assert_eq!(oval.width(), 100.0);
        assert_eq!(oval.center_x, 100.0);
        assert_eq!(oval.center_y, 50.0);
    }

    #[test]
    fn tall_surface_is_width_bound() {
        let oval = resolve_oval(&surface(100.0, 300.0), 1.0);
        assert_eq!(oval.width(), 100.0);
        assert_eq!(oval.center_x, 50.0);
        assert_eq!(oval.center_y, 300.0);
    }

    #[test]
    fn scale_shrinks_around_the_same_center() {
        let s = surface(400.0, 200.0);
        let outer = resolve_oval(&s, 1.0);
        let pivot = resolve_oval(&s, 0.1);
        assert_eq!(outer.center(), pivot.center());
        assert!((pivot.width() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn padding_offsets_the_drawable_area() {
        let s = Surface::new(
            220.0,
            80.0,
            Padding {
                left: 10.0,
                top: 20.0,
                right: 10.0,
                bottom: 10.0,
            },
        );
        let oval = resolve_oval(&s, 1.0);
        // drawable 200x50, height bound
        assert_eq!(oval.width(), 100.0);
        assert_eq!(oval.center_x, 110.0);
        assert_eq!(oval.center_y, 70.0);
    }

    #[test]
    fn oversized_padding_collapses_to_a_point() {
        let s = Surface::new(10.0, 10.0, Padding::uniform(20.0));
        assert_eq!(resolve_oval(&s, 1.0).radius, 0.0);
    }

    #[test]
    fn dial_angles_mirror_through_the_top() {
        let oval = resolve_oval(&surface(200.0, 100.0), 1.0);
        let top = oval.point_at(90.0, 50.0);
        assert!((top.x - 100.0).abs() < 1e-9);
        assert!((top.y - 50.0).abs() < 1e-9);

        let left = oval.point_at(0.0, 50.0);
        assert!((left.x - 50.0).abs() < 1e-9);
        assert!((left.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn measure_prefers_two_to_one() {
        assert_eq!(
            measure(Constraints::width(400)),
            Size {
                width: 400,
                height: 200
            }
        );
        assert_eq!(
            measure(Constraints::height(150)),
            Size {
                width: 300,
                height: 150
            }
        );
        assert_eq!(measure(Constraints::default()), Size::default());
        assert_eq!(
            measure(Constraints::exact(500, 300)),
            Size {
                width: 300,
                height: 150
            }
        );
    }

    proptest! {
        #[test]
        fn prop_half_disc_fits_drawable_area(w in 1.0f64..2000.0, h in 1.0f64..2000.0) {
            let oval = resolve_oval(&surface(w, h), 1.0);
            prop_assert!(oval.width() <= w + 1e-9);
            prop_assert!(oval.radius <= h + 1e-9);
            prop_assert!((oval.center_y - h).abs() < 1e-9);
            prop_assert!((oval.center_x - w / 2.0).abs() < 1e-9);
        }
    }
}
