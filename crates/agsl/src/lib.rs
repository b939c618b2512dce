//! Source-text utilities for AGSL fragment shaders.
//!
//! AGSL is the GLSL-like dialect used by the preview: a fragment shader is a
//! free-standing source string whose entry point is the literal signature
//! `vec4 main( vec2 fragCoord )` and whose built-in inputs are the `uTime`,
//! `uResolution`, and `uDate` uniforms. This crate never parses or validates
//! shader code; everything here works on the raw text (descriptors, literal
//! name substitution, entry-point detection) and leaves real validation to
//! the GPU backend compiler.

mod descriptor;
mod dialect;
mod entry;

pub use descriptor::{ShaderDescriptor, DEFAULT_SHADER, DEFAULT_SPEED_MODIFIER};
pub use dialect::replace_shadertoy_names;
pub use entry::{check_entry_point, MissingEntryPoint, MAIN_SIGNATURE};
