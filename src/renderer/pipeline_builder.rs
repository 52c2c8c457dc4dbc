//! # WGPU Pipeline Builder Utilities
//!
//! Builder patterns for the render pipeline and bind group layout used by the
//! fractal program. They keep pipeline creation in one place and set the
//! defaults the fullscreen quad needs.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let layout = BindGroupLayoutBuilder::new(&device)
//!     .with_label("Fractal Uniform Layout")
//!     .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX_FRAGMENT)
//!     .build();
//!
//! let pipeline = PipelineBuilder::new(&device, surface_format)
//!     .with_label("Fractal Pipeline")
//!     .with_vertex_module(&vertex_module)
//!     .with_fragment_module(&fragment_module)
//!     .with_vertex_buffer(vertex_layout)
//!     .with_bind_group_layout(&layout)
//!     .with_no_culling()
//!     .build()?;
//! ```

use crate::error::ShaderError;

/// Builder for render pipelines with separate vertex and fragment modules.
///
/// ## Default Configuration
///
/// - Vertex entry point: `"vs_main"`
/// - Fragment entry point: `"fs_main"`
/// - Blend state: `REPLACE` (no blending)
/// - Cull mode: `Back` face culling
/// - Primitive topology: `TriangleList`
/// - Front face: Counter-clockwise
pub struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    surface_format: wgpu::TextureFormat,
    label: Option<&'a str>,
    vertex_module: Option<&'a wgpu::ShaderModule>,
    fragment_module: Option<&'a wgpu::ShaderModule>,
    vertex_entry: Option<&'a str>,
    fragment_entry: Option<&'a str>,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    blend_state: Option<wgpu::BlendState>,
    cull_mode: Option<wgpu::Face>,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a new pipeline builder with default settings.
    ///
    /// - `device` - The WGPU device used to create the pipeline
    /// - `surface_format` - The texture format of the render target
    pub fn new(device: &'a wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            surface_format,
            label: None,
            vertex_module: None,
            fragment_module: None,
            vertex_entry: Some("vs_main"),
            fragment_entry: Some("fs_main"),
            vertex_buffers: Vec::new(),
            bind_group_layouts: Vec::new(),
            blend_state: Some(wgpu::BlendState::REPLACE),
            cull_mode: Some(wgpu::Face::Back),
        }
    }

    /// Set the pipeline label for debugging purposes.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the compiled vertex stage.
    pub fn with_vertex_module(mut self, module: &'a wgpu::ShaderModule) -> Self {
        self.vertex_module = Some(module);
        self
    }

    /// Set the compiled fragment stage.
    pub fn with_fragment_module(mut self, module: &'a wgpu::ShaderModule) -> Self {
        self.fragment_module = Some(module);
        self
    }

    /// Add a vertex buffer layout. Buffers bind to slots in the order added.
    pub fn with_vertex_buffer(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    /// Add a bind group layout. Layouts bind to groups in the order added.
    pub fn with_bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    /// Disable face culling.
    ///
    /// The quad is seen from both sides once the camera moves around it.
    pub fn with_no_culling(mut self) -> Self {
        self.cull_mode = None;
        self
    }

    /// Build the render pipeline.
    ///
    /// Validation errors raised by wgpu while creating the pipeline are
    /// returned as [`ShaderError::Link`].
    pub fn build(self) -> Result<wgpu::RenderPipeline, ShaderError> {
        let vertex_module = self
            .vertex_module
            .ok_or(ShaderError::MissingStage(crate::renderer::ShaderStage::Vertex))?;
        let fragment_module = self
            .fragment_module
            .ok_or(ShaderError::MissingStage(crate::renderer::ShaderStage::Fragment))?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: self.label,
                bind_group_layouts: &self.bind_group_layouts,
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: vertex_module,
                    entry_point: self.vertex_entry,
                    buffers: &self.vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment_module,
                    entry_point: self.fragment_entry,
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: self.blend_state,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: self.cull_mode,
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
                multiview: None,
                cache: None,
            });

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(ShaderError::Link(error.to_string())),
            None => Ok(pipeline),
        }
    }
}

/// Builder for bind group layouts.
pub struct BindGroupLayoutBuilder<'a> {
    device: &'a wgpu::Device,
    label: Option<&'a str>,
    entries: Vec<wgpu::BindGroupLayoutEntry>,
}

impl<'a> BindGroupLayoutBuilder<'a> {
    /// Create an empty layout builder.
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self {
            device,
            label: None,
            entries: Vec::new(),
        }
    }

    /// Set the layout label for debugging purposes.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Add a uniform buffer binding.
    ///
    /// ```wgsl
    /// @group(0) @binding(0) var<uniform> uniforms: Uniforms;
    /// ```
    pub fn with_uniform_buffer(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
        self
    }

    /// Build the bind group layout.
    pub fn build(self) -> wgpu::BindGroupLayout {
        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &self.entries,
                label: self.label,
            })
    }
}

/// Vertex buffer attributes for `attributes`, bound to locations in order.
///
/// Returns the attribute list and the array stride. Attributes with a zero
/// stride are tightly packed, so the stride is the sum of their sizes.
pub fn vertex_attributes(
    attributes: &[crate::renderer::VertexAttribute],
) -> Result<(Vec<wgpu::VertexAttribute>, wgpu::BufferAddress), ShaderError> {
    let mut layout = Vec::with_capacity(attributes.len());
    let mut packed_stride = 0;
    let mut explicit_stride = None;

    for (location, attribute) in attributes.iter().enumerate() {
        let format = vertex_format(attribute)?;
        layout.push(wgpu::VertexAttribute {
            offset: attribute.offset,
            shader_location: location as u32,
            format,
        });
        packed_stride = packed_stride.max(attribute.offset + attribute.size());
        if attribute.stride != 0 {
            explicit_stride = Some(attribute.stride);
        }
    }

    Ok((layout, explicit_stride.unwrap_or(packed_stride)))
}

fn vertex_format(
    attribute: &crate::renderer::VertexAttribute,
) -> Result<wgpu::VertexFormat, ShaderError> {
    use crate::renderer::AttributeKind;

    let unsupported = |reason: &str| ShaderError::UnsupportedAttribute {
        name: attribute.name.to_string(),
        reason: reason.to_string(),
    };

    if attribute.normalized {
        return Err(unsupported("float attributes cannot be normalized"));
    }

    match (attribute.kind, attribute.components) {
        (AttributeKind::Float32, 1) => Ok(wgpu::VertexFormat::Float32),
        (AttributeKind::Float32, 2) => Ok(wgpu::VertexFormat::Float32x2),
        (AttributeKind::Float32, 3) => Ok(wgpu::VertexFormat::Float32x3),
        (AttributeKind::Float32, 4) => Ok(wgpu::VertexFormat::Float32x4),
        _ => Err(unsupported("component count must be between 1 and 4")),
    }
}
