//! wgpu-backed [`ShaderPipeline`].
//!
//! [`WgpuProgram`] collects WGSL stages, compiles them on [`finalize`], links a
//! render pipeline each time a vertex attribute is bound, and writes named
//! uniforms into a single uniform buffer.
//!
//! [`finalize`]: ShaderPipeline::finalize

use crate::error::ShaderError;
use crate::renderer::pipeline_builder::{BindGroupLayoutBuilder, PipelineBuilder, vertex_attributes};
use crate::renderer::uniform::FractalUniforms;
use crate::renderer::wgpu_lib::GpuContext;
use crate::renderer::{ShaderPipeline, ShaderSource, ShaderStage, UniformValue, VertexAttribute};
use std::borrow::Cow;
use std::rc::Rc;

/// GPU objects that exist once the stages compiled.
struct CompiledProgram {
    vertex_module: wgpu::ShaderModule,
    fragment_module: wgpu::ShaderModule,
    uniform_buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

/// A vertex + fragment program with one uniform block at `@group(0) @binding(0)`.
pub struct WgpuProgram {
    gpu: Rc<GpuContext>,
    vertex_source: Option<Cow<'static, str>>,
    fragment_source: Option<Cow<'static, str>>,
    attributes: Vec<VertexAttribute>,
    uniforms: FractalUniforms,
    compiled: Option<CompiledProgram>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl WgpuProgram {
    pub(crate) fn new(gpu: Rc<GpuContext>) -> Self {
        Self {
            gpu,
            vertex_source: None,
            fragment_source: None,
            attributes: Vec::new(),
            uniforms: FractalUniforms::new(),
            compiled: None,
            pipeline: None,
        }
    }

    /// The linked pipeline, available after the first attribute is bound.
    pub fn pipeline(&self) -> Result<&wgpu::RenderPipeline, ShaderError> {
        self.pipeline.as_ref().ok_or(ShaderError::NotFinalized)
    }

    /// Bind group holding the uniform buffer.
    pub fn bind_group(&self) -> Result<&wgpu::BindGroup, ShaderError> {
        self.compiled
            .as_ref()
            .map(|compiled| &compiled.bind_group)
            .ok_or(ShaderError::NotFinalized)
    }

    fn compile_stage(&self, stage: ShaderStage) -> Result<wgpu::ShaderModule, ShaderError> {
        let source = match stage {
            ShaderStage::Vertex => self.vertex_source.as_ref(),
            ShaderStage::Fragment => self.fragment_source.as_ref(),
        }
        .ok_or(ShaderError::MissingStage(stage))?;

        let label = match stage {
            ShaderStage::Vertex => "Fractal Vertex Shader",
            ShaderStage::Fragment => "Fractal Fragment Shader",
        };

        let device = &self.gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.clone()),
        });

        match pollster::block_on(device.pop_error_scope()) {
            Some(error) => Err(ShaderError::Compile {
                stage,
                message: error.to_string(),
            }),
            None => Ok(module),
        }
    }

    fn link(&mut self) -> Result<(), ShaderError> {
        let compiled = self.compiled.as_ref().ok_or(ShaderError::NotFinalized)?;
        let (attributes, array_stride) = vertex_attributes(&self.attributes)?;

        let pipeline = PipelineBuilder::new(&self.gpu.device, self.gpu.surface_format)
            .with_label("Fractal Pipeline")
            .with_vertex_module(&compiled.vertex_module)
            .with_fragment_module(&compiled.fragment_module)
            .with_vertex_buffer(wgpu::VertexBufferLayout {
                array_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            })
            .with_bind_group_layout(&compiled.bind_group_layout)
            .with_no_culling()
            .build()?;

        self.pipeline = Some(pipeline);
        Ok(())
    }
}

impl ShaderPipeline for WgpuProgram {
    fn init(&mut self) {
        self.vertex_source = None;
        self.fragment_source = None;
        self.attributes.clear();
        self.uniforms = FractalUniforms::new();
        self.compiled = None;
        self.pipeline = None;
    }

    fn add_shader(&mut self, source: ShaderSource, stage: ShaderStage) -> Result<(), ShaderError> {
        let text = source.load(stage)?;
        tracing::debug!(%stage, bytes = text.len(), "shader source added");
        match stage {
            ShaderStage::Vertex => self.vertex_source = Some(text),
            ShaderStage::Fragment => self.fragment_source = Some(text),
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), ShaderError> {
        let vertex_module = self.compile_stage(ShaderStage::Vertex)?;
        let fragment_module = self.compile_stage(ShaderStage::Fragment)?;

        let device = &self.gpu.device;
        let uniform_buffer = self.uniforms.create_buffer(device);
        let bind_group_layout = BindGroupLayoutBuilder::new(device)
            .with_label("fractal_uniform_bind_group_layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX_FRAGMENT)
            .build();
        let bind_group =
            FractalUniforms::create_bind_group(&uniform_buffer, &bind_group_layout, device);

        self.compiled = Some(CompiledProgram {
            vertex_module,
            fragment_module,
            uniform_buffer,
            bind_group_layout,
            bind_group,
        });
        self.pipeline = None;
        tracing::debug!("shader program compiled");
        Ok(())
    }

    fn add_attribute(&mut self, attribute: VertexAttribute) -> Result<(), ShaderError> {
        tracing::debug!(
            name = %attribute.name,
            location = self.attributes.len(),
            components = attribute.components,
            "binding vertex attribute"
        );
        self.attributes.push(attribute);
        if let Err(err) = self.link() {
            self.attributes.pop();
            return Err(err);
        }
        Ok(())
    }

    fn add_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), ShaderError> {
        let changed = self.uniforms.set(name, value)?;
        if let Some(compiled) = &self.compiled {
            self.gpu.queue.write_buffer(
                &compiled.uniform_buffer,
                changed.start as wgpu::BufferAddress,
                &self.uniforms.as_bytes()[changed],
            );
        }
        Ok(())
    }
}
