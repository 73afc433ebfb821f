use bon::Builder;
use std::fmt;
use std::sync::Arc;

use crate::error::{GaugeError, Result};
use crate::geometry::Padding;

// ============================================================================
// DEFAULTS
// ============================================================================

pub const DEFAULT_MAX_VALUE: f64 = 100.0;
pub const DEFAULT_MAJOR_STEP: f64 = 20.0;
pub const DEFAULT_MINOR_TICKS: u32 = 1;
pub const DEFAULT_LABEL_TEXT_SIZE: f32 = 14.0;
pub const DEFAULT_COLOR: Color = Color::new(180, 180, 180);

pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 1500;
pub const DEFAULT_ANIMATION_DELAY_MS: u64 = 200;

// Layer scale factors handed to `resolve_oval`
pub const OUTER_LAYER: f64 = 1.0;
pub const INNER_LAYER: f64 = 0.9;
pub const RANGE_LAYER: f64 = 0.7;
pub const PIVOT_LAYER: f64 = 0.1;
pub const MASK_LAYER: f64 = 1.1;

/// Tick ring radius as a fraction of the outer oval width.
pub const TICK_RING_FACTOR: f64 = 0.35;
pub const MAJOR_TICK_LENGTH: f64 = 30.0;
pub const MINOR_TICK_LENGTH: f64 = MAJOR_TICK_LENGTH / 2.0;
/// Distance between the outer end of a major tick and its label.
pub const LABEL_GAP: f64 = 8.0;
/// How far the needle reaches past the tick ring.
pub const NEEDLE_OVERHANG: f64 = 10.0;

// ============================================================================
// COLOR
// ============================================================================

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

// ============================================================================
// LABELS
// ============================================================================

/// Renders the text shown next to a major tick from `(progress, max_value)`.
#[derive(Clone)]
pub struct LabelFormatter(Arc<dyn Fn(f64, f64) -> String + Send + Sync>);

impl LabelFormatter {
    pub fn new(f: impl Fn(f64, f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Labels each major tick with its progress value rounded to an integer.
    pub fn integer() -> Self {
        Self::new(|progress, _max| format!("{}", progress.round() as i64))
    }

    pub fn label_for(&self, progress: f64, max_value: f64) -> String {
        (self.0)(progress, max_value)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

// ============================================================================
// STYLE
// ============================================================================

/// Paint settings for every visual layer of the gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeStyle {
    pub background_color: Color,
    pub inner_color: Color,
    pub text_color: Color,
    pub needle_color: Color,
    /// Tint for the center mask outline; `None` leaves the mask to the host.
    pub mask_color: Option<Color>,
    pub tick_thickness: f32,
    pub range_thickness: f32,
    pub needle_thickness: f32,
}

impl Default for GaugeStyle {
    fn default() -> Self {
        Self {
            background_color: Color::from_hex(0xCBCCD1),
            inner_color: Color::from_hex(0x584EE5),
            text_color: Color::BLACK,
            needle_color: Color::from_hex(0x584EE5),
            mask_color: None,
            tick_thickness: 4.0,
            range_thickness: 5.0,
            needle_thickness: 5.0,
        }
    }
}

// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = DEFAULT_MAX_VALUE)]
    pub max_value: f64,
    #[builder(default = DEFAULT_MAJOR_STEP)]
    pub major_step: f64,
    #[builder(default = DEFAULT_MINOR_TICKS)]
    pub minor_ticks_per_major: u32,
    #[builder(default = DEFAULT_COLOR)]
    pub default_color: Color,
    #[builder(default = DEFAULT_LABEL_TEXT_SIZE)]
    pub label_text_size: f32,
    pub label_formatter: Option<LabelFormatter>,
    #[builder(default)]
    pub padding: Padding,
    #[builder(default)]
    pub style: GaugeStyle,

    // Window configuration
    #[builder(default = "SpeedView".to_string())]
    pub title: String,
    #[builder(default = 600)]
    pub window_width: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    /// TrueType/OpenType bytes used for tick labels.
    pub font_data: Option<Vec<u8>>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    /// Checks the invariants a gauge cannot be built without.
    pub fn validate(&self) -> Result<()> {
        validate_positive("max_value", self.max_value)?;
        validate_positive("major_step", self.major_step)?;
        validate_positive("label_text_size", f64::from(self.label_text_size))?;
        validate_positive("max_framerate", self.max_framerate)?;
        Ok(())
    }
}

pub(crate) fn validate_positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GaugeError::config(field, value))
    }
}
