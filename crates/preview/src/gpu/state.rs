use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::cache::{CacheOutcome, ProgramCache};
use crate::compile::CompileError;
use crate::runtime::{plan_frame, FramePlan, Viewport};
use crate::uniforms::UniformSet;

use super::context::GpuContext;
use super::pipeline::{fallback_pipeline, PipelineLayouts};

/// Owns every GPU resource behind one preview surface.
///
/// Created when the surface comes up and dropped with it, which releases
/// the compiled program, the uniform buffer, and the swapchain
/// deterministically.
pub(crate) struct GpuState {
    context: GpuContext,
    layouts: PipelineLayouts,
    fallback: wgpu::RenderPipeline,
    cache: ProgramCache,
    uniforms: UniformSet,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        size: PhysicalSize<u32>,
        initial_source: &str,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, size)?;
        let layouts = PipelineLayouts::new(&context.device);
        let fallback = fallback_pipeline(&context.device, &layouts, context.surface_format)?;

        let uniforms = UniformSet::new();
        let uniform_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("uniform buffer"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
        let uniform_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut state = Self {
            context,
            layouts,
            fallback,
            cache: ProgramCache::new(),
            uniforms,
            uniform_buffer,
            uniform_bind_group,
        };
        state.set_source(initial_source);
        Ok(state)
    }

    /// Hands the current source to the memoized program cache. Unchanged
    /// text is a no-op, so this is called every frame.
    pub(crate) fn set_source(&mut self, source: &str) -> CacheOutcome {
        self.cache.ensure(
            &self.context.device,
            &self.layouts,
            self.context.surface_format,
            source,
        )
    }

    pub(crate) fn last_error(&self) -> Option<&CompileError> {
        self.cache.last_error()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Renders one frame: stages uniforms when the viewport is ready and a
    /// program exists, otherwise paints the fallback brush.
    pub(crate) fn render(
        &mut self,
        elapsed_seconds: f32,
        include_date: bool,
    ) -> Result<(), wgpu::SurfaceError> {
        let viewport = Viewport::from(self.context.size);
        let plan = plan_frame(viewport, self.cache.program().is_some(), elapsed_seconds);

        if let FramePlan::Shader { elapsed_seconds } = plan {
            self.uniforms.set_resolution(viewport.width, viewport.height);
            self.uniforms.set_time(elapsed_seconds);
            if include_date {
                self.uniforms.refresh_date();
            } else {
                self.uniforms.clear_date();
            }
            self.context.queue.write_buffer(
                &self.uniform_buffer,
                0,
                bytemuck::bytes_of(&self.uniforms),
            );
        }

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("preview pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            match (plan, self.cache.program()) {
                (FramePlan::Shader { .. }, Some(program)) => {
                    render_pass.set_pipeline(&program.pipeline);
                    render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                }
                _ => {
                    render_pass.set_pipeline(&self.fallback);
                }
            }
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
