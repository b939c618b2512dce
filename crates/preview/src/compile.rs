use std::borrow::Cow;

use wgpu::naga::ShaderStage;

use agsl::MAIN_SIGNATURE;

/// Backend rejection of a shader source, carrying the compiler diagnostic.
///
/// Non-fatal and recoverable: the caller keeps the last-good program (or
/// the fallback brush) on screen and the error state is cleared by the next
/// successful compile of different text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("shader compilation failed: {message}")]
pub struct CompileError {
    pub message: String,
}

impl From<wgpu::Error> for CompileError {
    fn from(err: wgpu::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Internal name the user entry point is rewritten to before wrapping.
const ENTRY_REWRITE: &str = "vec4 agsl_entry( vec2 fragCoord )";

/// Produces a self-contained GLSL fragment shader from raw AGSL code.
///
/// Steps performed:
///
/// 1. Strip a leading `#version` directive and declarations of the built-in
///    uniforms (`uTime`, `uResolution`, `uDate`) so our own definitions win.
/// 2. Rewrite the literal entry signature `vec4 main( vec2 fragCoord )` to
///    an internal name; GLSL reserves `main` for the void entry point.
/// 3. Prepend [`HEADER`] (uniform block plus macro aliases) and append
///    [`FOOTER`] (the real `main`, delegating to the rewritten entry).
///
/// Sources without the exact signature pass through unrewritten and fail in
/// the backend with its own diagnostic; the advisory entry-point check has
/// already flagged them by then.
pub(crate) fn wrap_agsl_fragment(source: &str) -> String {
    let mut skipped_version = false;
    let mut sanitized = String::new();
    for line in source.lines() {
        let trimmed = line.trim_start();
        if !skipped_version && trimmed.starts_with("#version") {
            skipped_version = true;
            continue;
        }
        let is_builtin_uniform = trimmed.starts_with("uniform ")
            && (trimmed.contains("uTime")
                || trimmed.contains("uResolution")
                || trimmed.contains("uDate"));
        if is_builtin_uniform {
            continue;
        }
        sanitized.push_str(line);
        sanitized.push('\n');
    }

    let sanitized = sanitized.replace(MAIN_SIGNATURE, ENTRY_REWRITE);

    format!("{HEADER}\n#line 1\n{sanitized}{FOOTER}")
}

/// Compiles the wrapped user fragment. Validation failures surface through
/// the device error scope pushed by the caller, not through this call.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device, source: &str) -> wgpu::ShaderModule {
    let wrapped = wrap_agsl_fragment(source);
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("agsl fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(wrapped),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles the embedded fallback brush fragment shader.
pub(crate) fn compile_fallback_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fallback brush fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FALLBACK_FRAGMENT_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// GLSL prologue injected ahead of every AGSL fragment shader.
///
/// The uniform block layout must match `UniformSet` in `uniforms.rs`:
/// `_uTime` rides in the padding slot after the vec3 resolution.
const HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform ShaderParams {
    vec3 _uResolution;
    float _uTime;
    vec4 _uDate;
} ubo;

// Map the AGSL builtin names onto UBO fields via macros to avoid clashes.
#define uResolution ubo._uResolution
#define uTime ubo._uTime
#define uDate ubo._uDate
";

/// GLSL epilogue delegating to the rewritten user entry point.
///
/// AGSL uses a top-left fragment origin, which matches `gl_FragCoord` here,
/// so no Y flip is applied.
const FOOTER: &str = r"void main() {
    vec2 fragCoord = gl_FragCoord.xy;
    outColor = agsl_entry(fragCoord);
}
";

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// Fallback brush: a quiet vertical gradient, usable with no uniforms at
/// all so it can never fail for the reasons user shaders do.
const FALLBACK_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

void main() {
    vec3 top = vec3(0.13, 0.14, 0.20);
    vec3 bottom = vec3(0.03, 0.03, 0.05);
    outColor = vec4(mix(bottom, top, v_uv.y), 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_strips_builtin_uniforms_and_version() {
        let source = r#"
#version 300 es
uniform float uTime;
uniform vec3 uResolution;
vec4 main( vec2 fragCoord ) {
    return vec4(fragCoord, 0.0, 1.0);
}
"#;
        let wrapped = wrap_agsl_fragment(source);
        assert!(!wrapped.contains("uniform float uTime"));
        assert!(!wrapped.contains("uniform vec3 uResolution"));
        assert!(!wrapped.contains("#version 300 es"));
        assert!(wrapped.starts_with("#version 450"));
    }

    #[test]
    fn wrap_rewrites_entry_signature() {
        let wrapped = wrap_agsl_fragment("vec4 main( vec2 fragCoord ) { return vec4(0.0); }");
        assert!(wrapped.contains("vec4 agsl_entry( vec2 fragCoord )"));
        assert!(wrapped.contains("outColor = agsl_entry(fragCoord);"));
        // Only the footer main survives.
        assert_eq!(wrapped.matches("void main()").count(), 1);
    }

    #[test]
    fn wrap_keeps_user_code_and_line_directive() {
        let wrapped = wrap_agsl_fragment("vec4 main( vec2 fragCoord ) { return vec4(uDate.x); }");
        assert!(wrapped.contains("#line 1"));
        assert!(wrapped.contains("uDate.x"));
    }

    #[test]
    fn wrap_passes_through_sources_without_entry_point() {
        // The advisory check owns this case; wrapping must not panic or
        // invent an entry point.
        let wrapped = wrap_agsl_fragment("void foo() {}");
        assert!(wrapped.contains("void foo() {}"));
        assert!(!wrapped.contains("agsl_entry( vec2"));
    }
}
