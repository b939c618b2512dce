use agsl::{check_entry_point, replace_shadertoy_names, ShaderDescriptor};
use tracing::warn;

use crate::runtime::{tick, FrameClock};

/// How edits reach the active shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Every edit replaces the active shader immediately.
    Live,
    /// Edits accumulate in the scratch buffer until [`ShaderSession::submit`].
    Staged,
}

/// Presentation and playback state for one editing session.
///
/// The session owns the active [`ShaderDescriptor`], the scratch buffer the
/// editor front-end writes into, the animation clock, and the playback
/// toggles. It never touches the GPU: the window runtime reads
/// [`ShaderSession::source`] each frame and the memoized program cache
/// downstream decides whether that means a recompile.
#[derive(Debug, Clone)]
pub struct ShaderSession {
    descriptor: ShaderDescriptor,
    scratch: String,
    mode: EditMode,
    clock: FrameClock,
    include_date: bool,
    entry_point_missing: bool,
}

impl ShaderSession {
    /// Starts a session around the given descriptor, in live mode, playing.
    pub fn new(descriptor: ShaderDescriptor) -> Self {
        let entry_point_missing = check_entry_point(&descriptor.source).is_err();
        if entry_point_missing {
            warn!(shader = %descriptor.name, "shader source is missing the AGSL entry point");
        }
        Self {
            scratch: descriptor.source.clone(),
            descriptor,
            mode: EditMode::Live,
            clock: FrameClock::new(),
            include_date: false,
            entry_point_missing,
        }
    }

    /// The active descriptor driving rendering.
    pub fn descriptor(&self) -> &ShaderDescriptor {
        &self.descriptor
    }

    /// Source text of the active shader.
    pub fn source(&self) -> &str {
        &self.descriptor.source
    }

    /// The scratch buffer as the editor currently sees it.
    pub fn scratch(&self) -> &str {
        &self.scratch
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switches edit modes. Entering live mode submits pending scratch
    /// edits so the preview and the buffer agree again.
    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
        if mode == EditMode::Live {
            self.install_scratch();
        }
    }

    /// Replaces the scratch buffer with new text.
    ///
    /// The entry-point advisory always tracks the scratch buffer (what the
    /// user sees), while the active shader only changes here in live mode.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.scratch = text.into();
        self.refresh_entry_advisory();
        if self.mode == EditMode::Live {
            self.install_scratch();
        }
    }

    /// Propagates staged scratch edits into the active shader.
    pub fn submit(&mut self) {
        self.install_scratch();
    }

    /// Applies the Shadertoy-to-AGSL uniform name substitution to the
    /// scratch buffer, propagating like a normal edit.
    pub fn translate_shadertoy(&mut self) {
        let translated = replace_shadertoy_names(&self.scratch);
        self.edit(translated);
    }

    fn install_scratch(&mut self) {
        if self.scratch == self.descriptor.source {
            return;
        }
        self.descriptor = self.descriptor.with_edited_source(self.scratch.clone());
        // New source identity: animations restart at t=0.
        self.clock.reset();
    }

    fn refresh_entry_advisory(&mut self) {
        let missing = check_entry_point(&self.scratch).is_err();
        if missing && !self.entry_point_missing {
            warn!("shader source is missing the AGSL entry point");
        }
        self.entry_point_missing = missing;
    }

    /// True while the advisory banner should be shown. The last-good
    /// compiled program keeps rendering regardless.
    pub fn entry_point_missing(&self) -> bool {
        self.entry_point_missing
    }

    /// Sets the speed modifier, clamped to non-negative.
    ///
    /// A new speed supersedes the descriptor just like a source edit, so
    /// the clock restarts at t=0. The compiled program is untouched:
    /// recompilation is keyed on source text alone.
    pub fn set_speed_modifier(&mut self, speed: f32) {
        let speed = speed.max(0.0);
        if speed == self.descriptor.speed_modifier {
            return;
        }
        self.descriptor = self.descriptor.with_speed(speed);
        self.clock.reset();
    }

    /// Nudges the speed modifier by `delta`, clamped to non-negative.
    pub fn adjust_speed(&mut self, delta: f32) {
        self.set_speed_modifier(self.descriptor.speed_modifier + delta);
    }

    pub fn speed_modifier(&self) -> f32 {
        self.descriptor.speed_modifier
    }

    pub fn is_playing(&self) -> bool {
        !self.clock.is_paused()
    }

    /// Pauses or resumes the animation clock. Pausing freezes the current
    /// elapsed value; resuming continues from it.
    pub fn set_playing(&mut self, playing: bool, now_millis: u64) {
        if playing {
            self.clock.resume(now_millis);
        } else {
            self.clock.pause(now_millis);
        }
    }

    pub fn toggle_playback(&mut self, now_millis: u64) {
        let playing = self.is_playing();
        self.set_playing(!playing, now_millis);
    }

    pub fn include_date(&self) -> bool {
        self.include_date
    }

    pub fn set_include_date(&mut self, include: bool) {
        self.include_date = include;
    }

    pub fn toggle_date(&mut self) {
        self.include_date = !self.include_date;
    }

    /// Advances the session by one displayed frame and returns the
    /// `uTime` value for it.
    pub fn frame(&mut self, now_millis: u64) -> f32 {
        let since_start = self.clock.sample(now_millis);
        tick(since_start, self.descriptor.speed_modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ShaderSession {
        ShaderSession::new(ShaderDescriptor::default())
    }

    #[test]
    fn live_edit_replaces_active_source() {
        let mut session = session();
        session.edit("vec4 main( vec2 fragCoord ) { return vec4(1.0); }");
        assert_eq!(session.source(), session.scratch());
    }

    #[test]
    fn staged_edit_waits_for_submit() {
        let mut session = session();
        let original = session.source().to_string();
        session.set_mode(EditMode::Staged);
        session.edit("vec4 main( vec2 fragCoord ) { return vec4(0.5); }");
        assert_eq!(session.source(), original);
        session.submit();
        assert_eq!(session.source(), session.scratch());
    }

    #[test]
    fn entering_live_mode_submits_pending_edits() {
        let mut session = session();
        session.set_mode(EditMode::Staged);
        session.edit("vec4 main( vec2 fragCoord ) { return vec4(0.0); }");
        session.set_mode(EditMode::Live);
        assert_eq!(session.source(), session.scratch());
    }

    #[test]
    fn descriptor_supersession_resets_clock() {
        let mut session = session();
        session.frame(0);
        assert!(session.frame(33_200) > 0.0);

        session.set_speed_modifier(2.0);
        assert_eq!(session.frame(40_000), 0.0, "speed change restarts at t=0");

        assert!(session.frame(50_000) > 0.0);
        session.edit("vec4 main( vec2 fragCoord ) { return vec4(0.0); }");
        assert_eq!(session.frame(60_000), 0.0, "source change restarts at t=0");
    }

    #[test]
    fn setting_unchanged_speed_keeps_clock_running() {
        let mut session = session();
        session.frame(0);
        session.frame(10_000);
        session.set_speed_modifier(session.speed_modifier());
        assert!(session.frame(10_000) > 0.0);
    }

    #[test]
    fn identical_edit_does_not_reset_clock() {
        let mut session = session();
        session.frame(0);
        session.frame(10_000);
        let text = session.source().to_string();
        session.edit(text);
        assert!(session.frame(10_000) > 0.0);
    }

    #[test]
    fn pause_freezes_elapsed_value() {
        let mut session = session();
        session.frame(0);
        session.set_playing(false, 16_600);
        let frozen = session.frame(50_000);
        assert_eq!(frozen, session.frame(90_000));
        session.set_playing(true, 100_000);
        assert!(session.frame(116_600) > frozen);
    }

    #[test]
    fn entry_advisory_tracks_scratch_buffer() {
        let mut session = session();
        assert!(!session.entry_point_missing());
        session.set_mode(EditMode::Staged);
        session.edit("void foo() {}");
        assert!(session.entry_point_missing());
        // Active program is untouched; the warning is advisory only.
        assert!(session.source().contains(agsl::MAIN_SIGNATURE));
    }

    #[test]
    fn translate_applies_literal_substitution() {
        let mut session = session();
        session.edit("uniform float iTime; void f(){ iTime; }");
        session.translate_shadertoy();
        assert_eq!(session.scratch(), "uniform float uTime; void f(){ uTime; }");
        assert_eq!(session.source(), session.scratch());
    }

    #[test]
    fn speed_clamps_to_non_negative() {
        let mut session = session();
        session.set_speed_modifier(0.1);
        session.adjust_speed(-1.0);
        assert_eq!(session.speed_modifier(), 0.0);
    }
}
