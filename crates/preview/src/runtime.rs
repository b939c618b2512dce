use winit::dpi::PhysicalSize;

/// Assumed milliseconds per display frame (~60 Hz pacing).
///
/// The elapsed-time unit fed to `uTime` is frame-normalized against this
/// constant. Displays running at other refresh rates animate faster or
/// slower accordingly; this is a documented approximation, not a
/// refresh-rate-independent clock.
const FRAME_MILLIS: f32 = 16.6;

/// Default slowdown applied before the user speed control.
const BASE_DIVISOR: f32 = 10.0;

/// Rounds to the given number of decimal places, half away from zero.
///
/// For the non-negative times produced here this equals half-up rounding.
/// Applied to the elapsed value so `uTime` stays stable across frames that
/// land on the same millisecond, avoiding perceptible jitter from float
/// noise.
pub fn round_to(value: f32, decimals: u32) -> f32 {
    let mut multiplier = 1.0_f32;
    for _ in 0..decimals {
        multiplier *= 10.0;
    }
    (value * multiplier).round() / multiplier
}

/// Computes the `uTime` value for one frame.
///
/// `since_start_millis` is the frame clock's elapsed time since the current
/// shader was installed; the result is expressed in display-refresh
/// normalized units (`ms / 16.6`), slowed by a factor of ten, scaled by the
/// effective speed, and rounded to three decimals. Monotonically
/// non-decreasing in `since_start_millis` for any non-negative speed, and
/// zero at zero regardless of speed.
pub fn tick(since_start_millis: u64, speed: f32) -> f32 {
    round_to((since_start_millis as f32 / FRAME_MILLIS) / BASE_DIVISOR * speed, 3)
}

/// Monotonic animation clock for one installed shader.
///
/// Counts milliseconds since the first frame after the current shader was
/// installed. Pausing freezes the elapsed value without resetting it;
/// resuming continues from where it froze. Swapping shaders resets the
/// clock so animations restart at t=0.
///
/// The clock works on caller-supplied millisecond timestamps rather than
/// reading time itself, which keeps it deterministic under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    start: Option<u64>,
    frozen: Option<u64>,
}

impl FrameClock {
    /// Creates a clock that starts on its first sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed milliseconds since the first sampled frame.
    ///
    /// The first call establishes the origin and returns zero. While frozen
    /// the last elapsed value is returned unchanged.
    pub fn sample(&mut self, now_millis: u64) -> u64 {
        if let Some(elapsed) = self.frozen {
            return elapsed;
        }
        let start = *self.start.get_or_insert(now_millis);
        now_millis.saturating_sub(start)
    }

    /// Freezes the clock at its current elapsed value.
    pub fn pause(&mut self, now_millis: u64) {
        if self.frozen.is_none() {
            let elapsed = self.sample(now_millis);
            self.frozen = Some(elapsed);
        }
    }

    /// Unfreezes the clock, continuing from the frozen elapsed value.
    pub fn resume(&mut self, now_millis: u64) {
        if let Some(elapsed) = self.frozen.take() {
            self.start = Some(now_millis.saturating_sub(elapsed));
        }
    }

    /// Restarts the clock at t=0; a frozen clock stays frozen at zero.
    pub fn reset(&mut self) {
        self.start = None;
        if self.frozen.is_some() {
            self.frozen = Some(0);
        }
    }

    /// True while the clock is frozen.
    pub fn is_paused(&self) -> bool {
        self.frozen.is_some()
    }
}

/// Viewport dimensions as seen by the uniform updater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniforms are only applied to strictly positive viewports; the aspect
    /// ratio component divides by height.
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl From<PhysicalSize<u32>> for Viewport {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}

/// What one frame should draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramePlan {
    /// Run the compiled program with freshly staged uniforms.
    Shader { elapsed_seconds: f32 },
    /// Paint the fallback brush; no uniforms are staged.
    Fallback,
}

/// Decides between the compiled program and the fallback brush.
///
/// The fallback is selected when no program has compiled successfully or
/// when the viewport is not ready (zero or negative extent); in both cases
/// uniform staging is skipped entirely for the frame.
pub fn plan_frame(viewport: Viewport, has_program: bool, elapsed_seconds: f32) -> FramePlan {
    if has_program && viewport.is_ready() {
        FramePlan::Shader { elapsed_seconds }
    } else {
        FramePlan::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_is_zero_at_origin() {
        for speed in [0.0, 0.5, 1.0, 7.25] {
            assert_eq!(tick(0, speed), 0.0);
        }
    }

    #[test]
    fn tick_is_monotonic() {
        let speed = 0.5;
        let mut last = 0.0;
        for millis in (0..100_000).step_by(7) {
            let value = tick(millis, speed);
            assert!(value >= last, "tick regressed at {millis}ms: {value} < {last}");
            last = value;
        }
    }

    #[test]
    fn tick_scales_with_speed() {
        // 16600ms is 1000 frame units; divided by ten and scaled.
        assert_eq!(tick(16_600, 1.0), 100.0);
        assert_eq!(tick(16_600, 0.5), 50.0);
        assert_eq!(tick(16_600, 2.0), 200.0);
    }

    #[test]
    fn rounding_boundary_values() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(1.2345, 3), 1.235);
        assert_eq!(round_to(1.2344, 3), 1.234);
        assert_eq!(round_to(1.2341, 3), 1.234);
        assert_eq!(round_to(0.0, 3), 0.0);
    }

    #[test]
    fn clock_starts_at_zero_on_first_sample() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.sample(5_000), 0);
        assert_eq!(clock.sample(5_250), 250);
    }

    #[test]
    fn pause_freezes_elapsed_without_reset() {
        let mut clock = FrameClock::new();
        clock.sample(1_000);
        clock.pause(1_400);
        assert!(clock.is_paused());
        assert_eq!(clock.sample(9_999), 400);
        clock.resume(2_000);
        assert_eq!(clock.sample(2_100), 500);
    }

    #[test]
    fn reset_restarts_at_zero() {
        let mut clock = FrameClock::new();
        clock.sample(1_000);
        assert_eq!(clock.sample(3_000), 2_000);
        clock.reset();
        assert_eq!(clock.sample(3_500), 0);
        assert_eq!(clock.sample(3_600), 100);
    }

    #[test]
    fn reset_while_paused_stays_frozen_at_zero() {
        let mut clock = FrameClock::new();
        clock.sample(1_000);
        clock.pause(1_500);
        clock.reset();
        assert!(clock.is_paused());
        assert_eq!(clock.sample(8_000), 0);
    }

    #[test]
    fn fallback_selected_for_empty_viewport() {
        let plan = plan_frame(Viewport::new(0.0, 600.0), true, 1.5);
        assert_eq!(plan, FramePlan::Fallback);
        let plan = plan_frame(Viewport::new(800.0, 0.0), true, 1.5);
        assert_eq!(plan, FramePlan::Fallback);
    }

    #[test]
    fn fallback_selected_without_program() {
        let plan = plan_frame(Viewport::new(800.0, 600.0), false, 1.5);
        assert_eq!(plan, FramePlan::Fallback);
    }

    #[test]
    fn shader_selected_when_ready() {
        let plan = plan_frame(Viewport::new(800.0, 600.0), true, 1.5);
        assert_eq!(plan, FramePlan::Shader { elapsed_seconds: 1.5 });
    }
}
