use tracing::{debug, warn};

use crate::compile::CompileError;
use crate::gpu::pipeline::{PipelineLayouts, ShaderPipeline};

/// Remembers the last source text a compile was attempted for.
///
/// The memo is keyed on the exact string value: setting identical text twice
/// in a row is a no-op, and any other state change (speed, playback, date
/// toggle) never reaches this layer at all.
#[derive(Debug, Default)]
pub(crate) struct SourceMemo {
    last: Option<String>,
}

impl SourceMemo {
    /// Records `source` and reports whether it differs from the previous
    /// attempt.
    pub fn should_compile(&mut self, source: &str) -> bool {
        if self.last.as_deref() == Some(source) {
            return false;
        }
        self.last = Some(source.to_string());
        true
    }
}

/// Outcome of [`ProgramCache::ensure`], mostly for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheOutcome {
    /// Source unchanged since the last attempt; nothing was done.
    Unchanged,
    /// Source changed and compiled successfully.
    Compiled,
    /// Source changed and the backend rejected it; the previous program
    /// (if any) stays installed.
    Failed,
}

/// Memoized shader program cache: one compiled program, one error slot.
///
/// A failed compile is terminal for that source text until the text changes
/// again; the last successfully compiled program keeps rendering in the
/// meantime, falling back to the fallback brush only when no program has
/// ever compiled.
pub(crate) struct ProgramCache {
    memo: SourceMemo,
    program: Option<ShaderPipeline>,
    last_error: Option<CompileError>,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self {
            memo: SourceMemo::default(),
            program: None,
            last_error: None,
        }
    }

    /// Recompiles if and only if `source` differs from the last attempt.
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        surface_format: wgpu::TextureFormat,
        source: &str,
    ) -> CacheOutcome {
        if !self.memo.should_compile(source) {
            return CacheOutcome::Unchanged;
        }

        match ShaderPipeline::new(device, layouts, surface_format, source) {
            Ok(pipeline) => {
                debug!(bytes = source.len(), "shader program compiled");
                self.program = Some(pipeline);
                self.last_error = None;
                CacheOutcome::Compiled
            }
            Err(err) => {
                warn!(error = %err, "shader compilation failed; keeping previous program");
                self.last_error = Some(err);
                CacheOutcome::Failed
            }
        }
    }

    pub fn program(&self) -> Option<&ShaderPipeline> {
        self.program.as_ref()
    }

    /// Diagnostic from the most recent failed attempt, cleared by the next
    /// successful compile.
    pub fn last_error(&self) -> Option<&CompileError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_compiles_distinct_sources_once_each() {
        let mut memo = SourceMemo::default();
        assert!(memo.should_compile("a"));
        assert!(!memo.should_compile("a"));
        assert!(!memo.should_compile("a"));
        assert!(memo.should_compile("b"));
        assert!(!memo.should_compile("b"));
    }

    #[test]
    fn memo_recompiles_when_text_returns_to_old_value() {
        // Only the immediately preceding attempt is remembered.
        let mut memo = SourceMemo::default();
        assert!(memo.should_compile("a"));
        assert!(memo.should_compile("b"));
        assert!(memo.should_compile("a"));
    }
}
