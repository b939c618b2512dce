/// Exact entry-point signature every AGSL fragment shader must define.
///
/// Detection is a literal substring match, spacing included; reformatting
/// the signature hides it from the check even though the backend compiler
/// may still accept the shader. The check is advisory for exactly that
/// reason.
pub const MAIN_SIGNATURE: &str = "vec4 main( vec2 fragCoord )";

/// Advisory raised when a shader source lacks [`MAIN_SIGNATURE`].
///
/// This is never a compile error: the caller surfaces it as a warning and
/// keeps rendering whatever program last compiled successfully.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("shader source does not define `{MAIN_SIGNATURE}`")]
pub struct MissingEntryPoint;

/// Checks a shader source for the required entry-point signature.
pub fn check_entry_point(source: &str) -> Result<(), MissingEntryPoint> {
    if source.contains(MAIN_SIGNATURE) {
        Ok(())
    } else {
        Err(MissingEntryPoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_signature() {
        let source = "vec4 main( vec2 fragCoord ) { return vec4(0.0); }";
        assert!(check_entry_point(source).is_ok());
    }

    #[test]
    fn rejects_source_without_entry_point() {
        assert_eq!(check_entry_point("void foo() {}"), Err(MissingEntryPoint));
    }

    #[test]
    fn spacing_matters() {
        // The historical check is literal, so a compact signature is missed.
        assert!(check_entry_point("vec4 main(vec2 fragCoord) {}").is_err());
    }
}
