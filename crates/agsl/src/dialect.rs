/// Uniform-name pairs translated between the Shadertoy and AGSL conventions.
const SUBSTITUTIONS: [(&str, &str); 3] = [
    ("iTime", "uTime"),
    ("iResolution", "uResolution"),
    ("iDate", "uDate"),
];

/// Rewrites Shadertoy-convention uniform names to the AGSL convention.
///
/// This is literal substring substitution, applied pair by pair. It is not
/// word-boundary aware: an occurrence inside a longer identifier is replaced
/// as well.
pub fn replace_shadertoy_names(source: &str) -> String {
    let mut out = source.to_string();
    for (from, to) in SUBSTITUTIONS {
        out = out.replace(from, to);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_time_and_resolution() {
        let source = "uniform float iTime; void f(){ iTime; }";
        assert_eq!(
            replace_shadertoy_names(source),
            "uniform float uTime; void f(){ uTime; }"
        );
    }

    #[test]
    fn replaces_all_three_names() {
        let source = "iTime iResolution iDate";
        assert_eq!(replace_shadertoy_names(source), "uTime uResolution uDate");
    }

    #[test]
    fn substitution_is_not_word_boundary_aware() {
        // Substrings inside longer identifiers are replaced too.
        assert_eq!(replace_shadertoy_names("float iTimeWarp;"), "float uTimeWarp;");
        assert_eq!(
            replace_shadertoy_names("vec3 myiResolutionCopy;"),
            "vec3 myuResolutionCopy;"
        );
    }

    #[test]
    fn leaves_unrelated_source_untouched() {
        let source = "vec4 main( vec2 fragCoord ) { return vec4(1.0); }";
        assert_eq!(replace_shadertoy_names(source), source);
    }
}
