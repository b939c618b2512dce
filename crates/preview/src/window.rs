use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use agsl::ShaderDescriptor;

use crate::cache::CacheOutcome;
use crate::gpu::state::GpuState;
use crate::session::ShaderSession;

/// Speed modifier step for the keyboard speed controls.
const SPEED_STEP: f32 = 0.1;

/// Configuration for one preview window.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Shader to install at startup.
    pub descriptor: ShaderDescriptor,
    /// Whether the `uDate` uniform starts enabled.
    pub include_date: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "shaderdesk preview".to_string(),
            descriptor: ShaderDescriptor::default(),
            include_date: false,
        }
    }
}

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside [`GpuState`] and [`ShaderSession`];
/// `Preview` wires them to a winit window and runs the frame pump.
pub struct Preview {
    config: PreviewConfig,
}

impl Preview {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks on the event loop until it closes.
    ///
    /// Keyboard controls: space toggles play/pause, `+`/`-` adjust the
    /// speed modifier, `d` toggles the date uniform, `r` applies the
    /// Shadertoy name substitution, escape exits.
    pub fn run(self) -> Result<()> {
        run_window(self.config)
    }
}

fn run_window(config: PreviewConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);

    let mut session = ShaderSession::new(config.descriptor);
    session.set_include_date(config.include_date);

    // GpuState owns every GPU resource for this surface; dropping it when
    // the event loop exits releases program, buffers, and swapchain with
    // the window.
    let mut state = GpuState::new(window.as_ref(), window.inner_size(), session.source())?;
    if let Some(err) = state.last_error() {
        warn!(error = %err, "startup shader failed to compile; showing fallback brush");
    }

    let epoch = Instant::now();

    let run_result = event_loop.run(move |event, elwt| {
        let now_millis = epoch.elapsed().as_millis() as u64;
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    match event.logical_key {
                        Key::Named(NamedKey::Space) => {
                            session.toggle_playback(now_millis);
                            info!(playing = session.is_playing(), "playback toggled");
                        }
                        Key::Named(NamedKey::Escape) => {
                            elwt.exit();
                        }
                        Key::Character(ref value) => match value.as_str() {
                            "d" | "D" => {
                                session.toggle_date();
                                info!(include_date = session.include_date(), "date uniform toggled");
                            }
                            "+" | "=" => {
                                session.adjust_speed(SPEED_STEP);
                                info!(speed = session.speed_modifier(), "speed modifier changed");
                            }
                            "-" | "_" => {
                                session.adjust_speed(-SPEED_STEP);
                                info!(speed = session.speed_modifier(), "speed modifier changed");
                            }
                            "r" | "R" => {
                                session.translate_shadertoy();
                                info!("applied Shadertoy uniform name substitution");
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                }
                WindowEvent::Resized(new_size) => {
                    state.resize(new_size);
                }
                WindowEvent::RedrawRequested => {
                    if state.set_source(session.source()) == CacheOutcome::Failed {
                        if let Some(err) = state.last_error() {
                            warn!(error = %err, "shader rejected; previous program stays on screen");
                        }
                    }

                    let elapsed_seconds = session.frame(now_millis);
                    match state.render(elapsed_seconds, session.include_date()) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            state.resize(state.size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("surface out of memory; exiting preview");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            warn!("surface timeout; retrying next frame");
                        }
                        Err(other) => {
                            warn!("surface error: {other:?}; retrying next frame");
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Continuous animation: paused sessions still repaint with
                // the frozen time so resizes stay live.
                window.request_redraw();
            }
            _ => {}
        }
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
