use bytemuck::{Pod, Zeroable};
use chrono::{Datelike, Local, Timelike};

/// Std140 uniform block shared with every compiled shader.
///
/// Layout must match the `ShaderParams` block declared in the GLSL header
/// (`compile.rs`): `vec3 _uResolution` with `float _uTime` packed into its
/// padding slot, then `vec4 _uDate`.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct UniformSet {
    pub u_resolution: [f32; 3],
    pub u_time: f32,
    pub u_date: [f32; 4],
}

unsafe impl Zeroable for UniformSet {}
unsafe impl Pod for UniformSet {}

impl UniformSet {
    pub fn new() -> Self {
        Self {
            u_resolution: [0.0; 3],
            u_time: 0.0,
            u_date: [0.0; 4],
        }
    }

    /// Stages the viewport size with its aspect ratio as third component.
    ///
    /// Callers gate on [`Viewport::is_ready`](crate::runtime::Viewport);
    /// the division assumes a strictly positive height.
    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.u_resolution = [width, height, width / height];
    }

    pub fn set_time(&mut self, elapsed_seconds: f32) {
        self.u_time = elapsed_seconds;
    }

    /// Populates `uDate` from the local wall clock: hour, minute, second,
    /// day-of-month as floats. Cosmetic, independent of the animation
    /// clock.
    pub fn refresh_date(&mut self) {
        let now = Local::now();
        self.u_date = [
            now.hour() as f32,
            now.minute() as f32,
            now.second() as f32,
            now.day() as f32,
        ];
    }

    /// Zeroes `uDate` for sessions with the date uniform disabled.
    pub fn clear_date(&mut self) {
        self.u_date = [0.0; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_two_vec4_slots() {
        assert_eq!(std::mem::size_of::<UniformSet>(), 32);
    }

    #[test]
    fn resolution_carries_aspect_ratio() {
        let mut uniforms = UniformSet::new();
        uniforms.set_resolution(1920.0, 1080.0);
        assert_eq!(uniforms.u_resolution[0], 1920.0);
        assert_eq!(uniforms.u_resolution[1], 1080.0);
        assert!((uniforms.u_resolution[2] - 1920.0 / 1080.0).abs() < f32::EPSILON);
    }

    #[test]
    fn date_components_are_in_range() {
        let mut uniforms = UniformSet::new();
        uniforms.refresh_date();
        let [hour, minute, second, day] = uniforms.u_date;
        assert!((0.0..24.0).contains(&hour));
        assert!((0.0..60.0).contains(&minute));
        assert!((0.0..62.0).contains(&second));
        assert!((1.0..=31.0).contains(&day));
        uniforms.clear_date();
        assert_eq!(uniforms.u_date, [0.0; 4]);
    }
}
