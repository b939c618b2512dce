/// Speed modifier applied when a descriptor does not override it.
pub const DEFAULT_SPEED_MODIFIER: f32 = 0.5;

/// Embedded default shader shown on first launch.
///
/// A classic time-varying colour wash; declares both built-in uniforms so it
/// doubles as a smoke test for the uniform plumbing.
pub const DEFAULT_SHADER: &str = r"uniform float uTime;
uniform vec3 uResolution;

vec4 main( vec2 fragCoord ) {
    // Normalized pixel coordinates (from 0 to 1)
    vec2 uv = fragCoord / uResolution.xy;

    // Time varying pixel color
    vec3 col = 0.5 + 0.5*cos(uTime+uv.xyx+vec3(0,2,4));

    return vec4(col,1.0);
}
";

/// Immutable description of one shader as the user authored it.
///
/// A descriptor is a plain value: every edit or speed change produces a new
/// descriptor rather than mutating the old one, so the renderer can compare
/// source identity to decide when to recompile and when to restart the
/// animation clock. Attribution fields are carried for display only.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDescriptor {
    /// Display name for this shader.
    pub name: String,
    /// Author attribution, if any.
    pub author: String,
    /// License name, if any.
    pub license: String,
    /// Raw AGSL fragment source, opaque to this crate.
    pub source: String,
    /// Per-shader time multiplier applied on top of the user speed control.
    pub speed_modifier: f32,
}

impl ShaderDescriptor {
    /// Builds an untitled descriptor around the given source text.
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with a different speed modifier, same source.
    pub fn with_speed(&self, speed_modifier: f32) -> Self {
        Self {
            speed_modifier,
            ..self.clone()
        }
    }

    /// Returns a copy with different source text, same metadata and speed.
    pub fn with_edited_source(&self, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..self.clone()
        }
    }

    /// True when both descriptors carry byte-identical source text.
    ///
    /// Source identity is what gates recompilation; a speed change
    /// supersedes the descriptor without changing it.
    pub fn same_source(&self, other: &ShaderDescriptor) -> bool {
        self.source == other.source
    }
}

impl Default for ShaderDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            license: String::new(),
            source: DEFAULT_SHADER.to_string(),
            speed_modifier: DEFAULT_SPEED_MODIFIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check_entry_point;

    #[test]
    fn default_shader_declares_entry_point() {
        assert!(check_entry_point(DEFAULT_SHADER).is_ok());
    }

    #[test]
    fn speed_change_preserves_source_identity() {
        let base = ShaderDescriptor::default();
        let faster = base.with_speed(2.0);
        assert!(base.same_source(&faster));
        assert_eq!(faster.speed_modifier, 2.0);
    }

    #[test]
    fn edit_changes_source_identity() {
        let base = ShaderDescriptor::default();
        let edited = base.with_edited_source("vec4 main( vec2 fragCoord ) { return vec4(0.0); }");
        assert!(!base.same_source(&edited));
        assert_eq!(edited.speed_modifier, base.speed_modifier);
    }
}
