use anyhow::{anyhow, Result};

use crate::compile::{
    compile_fallback_shader, compile_fragment_shader, compile_vertex_shader, CompileError,
};

/// Resources shared by every pipeline built for one device: the uniform
/// bind group layout and the full-screen triangle vertex stage.
pub(crate) struct PipelineLayouts {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub vertex_module: wgpu::ShaderModule,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let vertex_module = compile_vertex_shader(device);

        Self {
            uniform_layout,
            vertex_module,
        }
    }
}

/// A successfully compiled user shader, ready to draw.
pub(crate) struct ShaderPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl ShaderPipeline {
    /// Wraps and compiles `source`, then builds the render pipeline.
    ///
    /// The whole attempt runs inside a validation error scope so backend
    /// rejections come back as a [`CompileError`] value instead of a device
    /// error callback; nothing here can abort a frame.
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        surface_format: wgpu::TextureFormat,
        source: &str,
    ) -> Result<Self, CompileError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let fragment_module = compile_fragment_shader(device, source);
        let pipeline = build_render_pipeline(
            device,
            layouts,
            surface_format,
            &fragment_module,
            &[&layouts.uniform_layout],
            "agsl pipeline",
        );

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(err.into());
        }

        Ok(Self { pipeline })
    }
}

/// Builds the fallback brush pipeline from the embedded gradient shader.
///
/// Runs once at startup; a failure here means the device itself is broken,
/// so it is a hard error rather than a recoverable compile diagnostic.
pub(crate) fn fallback_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let fragment_module = compile_fallback_shader(device);
    let pipeline = build_render_pipeline(
        device,
        layouts,
        surface_format,
        &fragment_module,
        &[],
        "fallback pipeline",
    );

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("fallback brush failed to compile: {err}"));
    }

    Ok(pipeline)
}

fn build_render_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
    fragment_module: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    label: &str,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &layouts.vertex_module,
            entry_point: Some("main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}
