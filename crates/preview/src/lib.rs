//! Windowed AGSL shader preview.
//!
//! The crate splits into a GPU-free core and a thin GPU shell:
//!
//! - [`runtime`] holds the animation clock, the tick formula, and the
//!   per-frame plan (shader vs fallback brush).
//! - [`session`] is the presentation state machine an editor front-end
//!   drives: scratch buffer, live/staged edit modes, playback, speed.
//! - [`compile`] wraps raw AGSL fragments into compilable GLSL and turns
//!   backend rejections into [`CompileError`] values.
//! - The internal `cache` and `gpu` modules memoize compiled programs and
//!   own the wgpu surface, pipelines, and uniform buffer.
//! - [`window`] pumps a winit event loop that feeds the session's source
//!   and clock into the GPU state every frame.
//!
//! Everything above the `gpu` module is pure and unit-tested without a
//! device.

mod cache;
pub mod compile;
mod gpu;
pub mod runtime;
pub mod session;
mod uniforms;
pub mod window;

pub use compile::CompileError;
pub use runtime::{plan_frame, round_to, tick, FrameClock, FramePlan, Viewport};
pub use session::{EditMode, ShaderSession};
pub use window::{Preview, PreviewConfig};
