// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod needle;
pub mod ranges;
pub mod raster;
pub mod scene;
pub mod ticks;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, info, warn};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use animation::{AnimationHandle, AnimationTask};
pub use config::{Color, GaugeConfig, GaugeStyle, LabelFormatter};
pub use error::{GaugeError, Result};
pub use geometry::{Constraints, Oval, Padding, Size, Surface};
pub use ranges::{ArcSegment, ColoredRange, RangeSet};
pub use scene::{ArcPaint, DrawCommand, Scene};
pub use ticks::Tick;

use animation::AnimationDriver;
use config::{validate_positive, DEFAULT_ANIMATION_DELAY_MS, DEFAULT_ANIMATION_DURATION_MS};
use raster::Canvas;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for driving a gauge shown with [`SpeedView::show_with_commands`]
#[derive(Debug, Clone, PartialEq)]
pub enum SpeedViewCommand {
    SetValue(f64),
    AnimateTo {
        target: f64,
        duration_ms: u64,
        delay_ms: u64,
    },
    CancelAnimation,
    SetMaxValue(f64),
    SetMajorStep(f64),
    SetMinorTicks(u32),
    AddColoredRange(f64, f64, Color), // begin, end, color
    ClearColoredRanges,
}

/// Analog half-disc gauge: configuration, value state and running animation.
#[derive(Debug)]
pub struct SpeedView {
    config: GaugeConfig,
    state: GaugeState,
    animation: AnimationDriver,
}

#[derive(Debug, Clone)]
struct GaugeState {
    value: f64,
    ranges: RangeSet,
    invalidated: bool,
}

impl SpeedView {
    pub fn new(config: GaugeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: GaugeState {
                value: 0.0,
                ranges: RangeSet::new(),
                invalidated: true,
            },
            animation: AnimationDriver::new(),
        })
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn value(&self) -> f64 {
        self.state.value
    }

    pub fn max_value(&self) -> f64 {
        self.config.max_value
    }

    pub fn ranges(&self) -> &RangeSet {
        &self.state.ranges
    }

    /// Returns whether a repaint was requested since the last call, and
    /// clears the request.
    pub fn take_invalidation(&mut self) -> bool {
        std::mem::take(&mut self.state.invalidated)
    }

    pub fn is_invalidated(&self) -> bool {
        self.state.invalidated
    }

    fn invalidate(&mut self) {
        self.state.invalidated = true;
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    /// Sets the top of the scale. The current value is pulled down if it
    /// no longer fits.
    pub fn set_max_value(&mut self, max_value: f64) -> Result<()> {
        validate_positive("max_value", max_value)?;
        self.config.max_value = max_value;
        self.state.value = self.state.value.min(max_value);
        debug!(max_value, "max value changed");
        self.invalidate();
        Ok(())
    }

    /// Sets the value immediately, clamping it down to the max value.
    pub fn set_value(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(GaugeError::config("value", value));
        }
        self.state.value = value.min(self.config.max_value);
        self.invalidate();
        Ok(())
    }

    /// Animates from the current value to `target`, starting now.
    pub fn set_value_animated(
        &mut self,
        target: f64,
        duration: Duration,
        start_delay: Duration,
    ) -> Result<AnimationHandle> {
        self.set_value_animated_at(target, duration, start_delay, Instant::now())
    }

    /// Animates from the current value to `target` as if started at
    /// `started_at`. Any animation in flight is cancelled.
    ///
    /// `target` must be positive; it is clamped down to the max value.
    pub fn set_value_animated_at(
        &mut self,
        target: f64,
        duration: Duration,
        start_delay: Duration,
        started_at: Instant,
    ) -> Result<AnimationHandle> {
        validate_positive("target", target)?;
        let target = target.min(self.config.max_value);
        let task = AnimationTask::new(
            self.state.value,
            target,
            duration,
            start_delay,
            started_at,
        );
        let handle = self.animation.start(task);
        self.invalidate();
        Ok(handle)
    }

    /// Animates to `target` with the default duration and start delay.
    pub fn animate_to(&mut self, target: f64) -> Result<AnimationHandle> {
        self.set_value_animated(
            target,
            Duration::from_millis(DEFAULT_ANIMATION_DURATION_MS),
            Duration::from_millis(DEFAULT_ANIMATION_DELAY_MS),
        )
    }

    /// Stops the running animation, keeping the value reached so far.
    pub fn cancel_animation(&mut self) {
        self.animation.cancel();
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_animating()
    }

    /// Advances the running animation to `now`. Returns whether the value
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.animation.tick(now) {
            Some(value) => {
                self.state.value = value.clamp(0.0, self.config.max_value);
                self.invalidate();
                true
            }
            None => false,
        }
    }

    pub fn set_major_step(&mut self, major_step: f64) -> Result<()> {
        validate_positive("major_step", major_step)?;
        self.config.major_step = major_step;
        debug!(major_step, "major step changed");
        self.invalidate();
        Ok(())
    }

    pub fn set_minor_ticks_per_major(&mut self, minor_ticks: u32) {
        self.config.minor_ticks_per_major = minor_ticks;
        debug!(minor_ticks, "minor ticks per major changed");
        self.invalidate();
    }

    pub fn set_default_color(&mut self, color: Color) {
        self.config.default_color = color;
        debug!(?color, "default color changed");
        self.invalidate();
    }

    pub fn set_label_text_size(&mut self, size: f32) -> Result<()> {
        validate_positive("label_text_size", f64::from(size))?;
        self.config.label_text_size = size;
        debug!(size, "label text size changed");
        self.invalidate();
        Ok(())
    }

    /// Installs or, with `None`, removes the tick label formatter.
    pub fn set_label_formatter(&mut self, formatter: Option<LabelFormatter>) {
        debug!(enabled = formatter.is_some(), "label formatter changed");
        self.config.label_formatter = formatter;
        self.invalidate();
    }

    pub fn set_style(&mut self, style: GaugeStyle) {
        self.config.style = style;
        self.invalidate();
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.config.padding = padding;
        self.invalidate();
    }

    pub fn add_colored_range(&mut self, begin: f64, end: f64, color: Color) -> Result<()> {
        let stored = self
            .state
            .ranges
            .add(begin, end, color, self.config.max_value)?;
        debug!(begin = stored.begin, end = stored.end, "colored range added");
        self.invalidate();
        Ok(())
    }

    pub fn clear_colored_ranges(&mut self) {
        self.state.ranges.clear();
        self.invalidate();
    }

    /// Applies one channel command.
    pub fn apply(&mut self, command: SpeedViewCommand) -> Result<()> {
        match command {
            SpeedViewCommand::SetValue(value) => self.set_value(value),
            SpeedViewCommand::AnimateTo {
                target,
                duration_ms,
                delay_ms,
            } => self
                .set_value_animated(
                    target,
                    Duration::from_millis(duration_ms),
                    Duration::from_millis(delay_ms),
                )
                .map(|_| ()),
            SpeedViewCommand::CancelAnimation => {
                self.cancel_animation();
                Ok(())
            }
            SpeedViewCommand::SetMaxValue(value) => self.set_max_value(value),
            SpeedViewCommand::SetMajorStep(value) => self.set_major_step(value),
            SpeedViewCommand::SetMinorTicks(count) => {
                self.set_minor_ticks_per_major(count);
                Ok(())
            }
            SpeedViewCommand::AddColoredRange(begin, end, color) => {
                self.add_colored_range(begin, end, color)
            }
            SpeedViewCommand::ClearColoredRanges => {
                self.clear_colored_ranges();
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Layout and rendering
    // ------------------------------------------------------------------------

    /// Preferred size for the host constraints (2:1).
    pub fn measure(&self, constraints: Constraints) -> Size {
        geometry::measure(constraints)
    }

    /// Surface of the given size using the configured padding.
    pub fn surface(&self, width: f64, height: f64) -> Surface {
        Surface::new(width, height, self.config.padding)
    }

    /// Primitives for the current state on `surface`.
    pub fn render(&self, surface: &Surface) -> Scene {
        scene::compose(&self.config, &self.state.ranges, self.state.value, surface)
    }

    // ------------------------------------------------------------------------
    // Windowed host
    // ------------------------------------------------------------------------

    pub fn show(&mut self) -> std::result::Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<SpeedViewCommand>,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn drain_commands(&mut self, receiver: &Receiver<SpeedViewCommand>) {
        while let Ok(command) = receiver.try_recv() {
            if let Err(err) = self.apply(command.clone()) {
                warn!(%err, ?command, "command rejected");
            }
        }
    }

    fn run_window(
        &mut self,
        receiver: Option<Receiver<SpeedViewCommand>>,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let size = self.measure(Constraints::width(self.config.window_width));
        let font = match self.config.font_data.clone() {
            Some(data) => Some(raster::load_font(data)?),
            None => {
                warn!("no font configured, tick labels will not be drawn");
                None
            }
        };

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(size.width as f64, size.height as f64))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();
        let inner = window.inner_size();
        let mut fb_width = inner.width as usize;
        let mut fb_height = inner.height as usize;
        let surface_texture = SurfaceTexture::new(inner.width, inner.height, &window);
        let mut pixels = Pixels::new(inner.width, inner.height, surface_texture)?;
        info!(width = fb_width, height = fb_height, "gauge window opened");

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!(%err, "frame buffer resize failed");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!(%err, "surface resize failed");
                        }
                        self.invalidate();
                    }
                    WindowEvent::RedrawRequested => {
                        let surface = self.surface(fb_width as f64, fb_height as f64);
                        let scene = self.render(&surface);
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        canvas.clear(Color::WHITE);
                        raster::paint_scene(&mut canvas, &scene, font.as_ref());
                        if let Err(err) = pixels.render() {
                            warn!(%err, "frame presentation failed");
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if let Some(ref receiver) = receiver {
                        self.drain_commands(receiver);
                    }
                    if last_frame.elapsed() >= frame_duration {
                        let now = Instant::now();
                        self.tick(now);
                        if self.take_invalidation() {
                            window_clone.request_redraw();
                        }
                        last_frame = now;
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge() -> SpeedView {
        SpeedView::new(GaugeConfig::default()).expect("default config is valid")
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let config = GaugeConfig::builder().max_value(-1.0).build();
        assert!(matches!(
            SpeedView::new(config),
            Err(GaugeError::InvalidConfiguration {
                field: "max_value",
                ..
            })
        ));
    }

    #[test]
    fn setters_request_a_repaint() {
        let mut gauge = gauge();
        assert!(gauge.take_invalidation());
        assert!(!gauge.take_invalidation());

        gauge.set_value(10.0).expect("valid value");
        assert!(gauge.take_invalidation());

        gauge.set_minor_ticks_per_major(3);
        assert!(gauge.take_invalidation());
    }

    #[test]
    fn failed_setters_leave_state_untouched() {
        let mut gauge = gauge();
        gauge.set_value(40.0).expect("valid value");
        gauge.take_invalidation();

        assert!(gauge.set_value(-1.0).is_err());
        assert!(gauge.set_value(f64::NAN).is_err());
        assert!(gauge.set_max_value(0.0).is_err());
        assert!(gauge.set_major_step(0.0).is_err());
        assert!(gauge.set_label_text_size(-2.0).is_err());

        assert_eq!(gauge.value(), 40.0);
        assert_eq!(gauge.max_value(), 100.0);
        assert!(!gauge.is_invalidated());
    }

    #[test]
    fn animated_set_requests_a_repaint() {
        let mut gauge = gauge();
        gauge.take_invalidation();
        gauge
            .set_value_animated_at(
                50.0,
                Duration::from_millis(100),
                Duration::from_millis(200),
                Instant::now(),
            )
            .expect("valid target");
        assert!(gauge.is_invalidated());
    }

    #[test]
    fn saturated_minor_ticks_still_render() {
        let mut gauge = gauge();
        gauge.set_minor_ticks_per_major(u32::MAX);
        let scene = gauge.render(&gauge.surface(400.0, 200.0));
        let lines = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        // every tick plus the needle
        assert_eq!(lines, ticks::MAX_TICKS + 1);
    }

    #[test]
    fn removing_the_formatter_drops_labels() {
        let mut gauge = gauge();
        gauge.set_label_formatter(Some(LabelFormatter::integer()));
        let surface = gauge.surface(400.0, 200.0);
        let has_text = |scene: &Scene| {
            scene
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Text { .. }))
        };
        assert!(has_text(&gauge.render(&surface)));

        gauge.set_label_formatter(None);
        assert!(!has_text(&gauge.render(&surface)));
    }

    #[test]
    fn lowering_the_max_pulls_the_value_down() {
        let mut gauge = gauge();
        gauge.set_value(80.0).expect("valid value");
        gauge.set_max_value(50.0).expect("valid max");
        assert_eq!(gauge.value(), 50.0);
    }

    #[test]
    fn animated_targets_must_be_positive() {
        let mut gauge = gauge();
        let now = Instant::now();
        assert!(gauge
            .set_value_animated_at(0.0, Duration::from_millis(10), Duration::ZERO, now)
            .is_err());
        assert!(gauge
            .set_value_animated_at(-5.0, Duration::from_millis(10), Duration::ZERO, now)
            .is_err());
        assert!(!gauge.is_animating());
    }

    #[test]
    fn ticking_pushes_values_and_repaints() {
        let mut gauge = gauge();
        let t0 = Instant::now();
        gauge
            .set_value_animated_at(500.0, Duration::from_millis(100), Duration::ZERO, t0)
            .expect("valid target");
        gauge.take_invalidation();

        assert!(gauge.tick(t0 + Duration::from_millis(50)));
        assert!((gauge.value() - 50.0).abs() < 1e-9);
        assert!(gauge.take_invalidation());

        assert!(gauge.tick(t0 + Duration::from_millis(100)));
        assert_eq!(gauge.value(), 100.0);
        assert!(!gauge.tick(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn cancelled_animation_keeps_the_reached_value() {
        let mut gauge = gauge();
        let t0 = Instant::now();
        let handle = gauge
            .set_value_animated_at(80.0, Duration::from_millis(100), Duration::ZERO, t0)
            .expect("valid target");
        gauge.tick(t0 + Duration::from_millis(25));
        gauge.cancel_animation();

        assert!(handle.is_cancelled());
        assert!(!gauge.tick(t0 + Duration::from_millis(100)));
        assert!((gauge.value() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn commands_route_to_setters() {
        let mut gauge = gauge();
        gauge
            .apply(SpeedViewCommand::AddColoredRange(
                0.0,
                50.0,
                Color::new(0, 0xff, 0),
            ))
            .expect("valid range");
        gauge
            .apply(SpeedViewCommand::SetValue(30.0))
            .expect("valid value");
        assert_eq!(gauge.ranges().len(), 1);
        assert_eq!(gauge.value(), 30.0);

        assert!(gauge
            .apply(SpeedViewCommand::AddColoredRange(9.0, 1.0, Color::BLACK))
            .is_err());
        gauge.apply(SpeedViewCommand::ClearColoredRanges).expect("infallible");
        assert!(gauge.ranges().is_empty());

        gauge
            .apply(SpeedViewCommand::AnimateTo {
                target: 60.0,
                duration_ms: 10,
                delay_ms: 0,
            })
            .expect("valid target");
        assert!(gauge.is_animating());
        gauge.apply(SpeedViewCommand::CancelAnimation).expect("infallible");
        assert!(!gauge.is_animating());
    }

    #[test]
    fn render_reflects_the_padding() {
        let mut gauge = gauge();
        gauge.set_padding(Padding::uniform(10.0));
        let surface = gauge.surface(420.0, 220.0);
        let scene = gauge.render(&surface);
        match &scene.commands()[0] {
            DrawCommand::Arc { oval, .. } => {
                assert_eq!(oval.center_x, 210.0);
                assert_eq!(oval.center_y, 210.0);
                assert_eq!(oval.radius, 200.0);
            }
            other => panic!("expected background arc, got {other:?}"),
        }
    }
}
