//! Rendering interfaces and their wgpu implementation.
//!
//! The render loop only talks to two traits:
//! - [`RenderDevice`]: clears, draws, presents and owns GPU buffers
//! - [`ShaderPipeline`]: builds the shader program and receives named uniforms
//!
//! [`wgpu_lib::WgpuDevice`] and [`program::WgpuProgram`] implement them on top of wgpu.

pub mod geometry;
pub mod pipeline_builder;
pub mod program;
pub mod uniform;
pub mod wgpu_lib;

use crate::error::{RenderError, ShaderError};
use crate::math::Mat4;
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

pub use geometry::QuadGeometry;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Runs once per vertex.
    Vertex,
    /// Runs once per covered pixel.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Where a stage's WGSL comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    /// Source compiled into the binary.
    Embedded(&'static str),
    /// Source read from disk when the shader is added.
    File(PathBuf),
}

impl ShaderSource {
    /// Returns the WGSL text, reading it from disk if needed.
    pub fn load(&self, stage: ShaderStage) -> Result<Cow<'static, str>, ShaderError> {
        match self {
            ShaderSource::Embedded(source) => Ok(Cow::Borrowed(source)),
            ShaderSource::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| ShaderError::Read {
                    stage,
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// Value of a named uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// A `mat4x4<f32>`.
    Mat4(Mat4),
    /// A `vec2<f32>`.
    Vec2([f32; 2]),
    /// A `u32`.
    Uint(u32),
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        UniformValue::Mat4(value)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(value: [f32; 2]) -> Self {
        UniformValue::Vec2(value)
    }
}

impl From<u32> for UniformValue {
    fn from(value: u32) -> Self {
        UniformValue::Uint(value)
    }
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// 32-bit float components.
    Float32,
}

/// Description of one vertex attribute, in the order it is bound.
///
/// A `stride` of zero means tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Name the shader uses for the attribute.
    pub name: Cow<'static, str>,
    /// Components per vertex, 1 to 4.
    pub components: u32,
    /// Component type.
    pub kind: AttributeKind,
    /// Whether integer data is mapped to `[0, 1]`.
    pub normalized: bool,
    /// Bytes between consecutive vertices.
    pub stride: u64,
    /// Byte offset of the first value.
    pub offset: u64,
}

impl VertexAttribute {
    /// The quad's 2D position: two tightly packed, non-normalized floats.
    pub const POSITION: VertexAttribute = VertexAttribute {
        name: Cow::Borrowed("position"),
        components: 2,
        kind: AttributeKind::Float32,
        normalized: false,
        stride: 0,
        offset: 0,
    };

    /// Size of one attribute value in bytes.
    pub fn size(&self) -> u64 {
        match self.kind {
            AttributeKind::Float32 => 4 * self.components as u64,
        }
    }
}

/// RGBA color used to clear the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    /// Red, 0 to 1.
    pub r: f64,
    /// Green, 0 to 1.
    pub g: f64,
    /// Blue, 0 to 1.
    pub b: f64,
    /// Alpha, 0 to 1.
    pub a: f64,
}

impl ClearColor {
    /// Background behind the fractal.
    pub const BACKGROUND: ClearColor = ClearColor {
        r: 0.2,
        g: 0.2,
        b: 0.3,
        a: 0.0,
    };
}

impl From<ClearColor> for wgpu::Color {
    fn from(color: ClearColor) -> Self {
        wgpu::Color {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// A shader program: stages, vertex attributes and named uniforms.
///
/// Expected call order is `init`, `add_shader` per stage, `finalize`,
/// `add_attribute` per attribute, then `add_uniform` as often as needed.
pub trait ShaderPipeline {
    /// Resets the program to an empty, unlinked state.
    fn init(&mut self);
    /// Adds the source for one stage, replacing any previous source for it.
    fn add_shader(&mut self, source: ShaderSource, stage: ShaderStage) -> Result<(), ShaderError>;
    /// Compiles every stage.
    fn finalize(&mut self) -> Result<(), ShaderError>;
    /// Binds the next vertex attribute and links the program.
    fn add_attribute(&mut self, attribute: VertexAttribute) -> Result<(), ShaderError>;
    /// Sets a named uniform.
    fn add_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), ShaderError>;
}

/// The narrow slice of a graphics API the render loop depends on.
pub trait RenderDevice {
    /// Shader program type this device can draw with.
    type Program: ShaderPipeline;
    /// GPU-resident quad geometry. Released when dropped.
    type Buffers;

    /// Creates an empty shader program bound to this device.
    fn create_program(&mut self) -> Self::Program;
    /// Uploads the quad vertices and indices.
    fn create_quad_buffers(&mut self, quad: &QuadGeometry) -> Result<Self::Buffers, RenderError>;
    /// Starts a frame cleared to `color`.
    fn clear(&mut self, color: ClearColor) -> Result<(), RenderError>;
    /// Draws `index_count` indices of `buffers` with `program` into the current frame.
    fn draw_indexed(
        &mut self,
        program: &Self::Program,
        buffers: &Self::Buffers,
        index_count: u32,
    ) -> Result<(), RenderError>;
    /// Submits and shows the current frame.
    fn present(&mut self) -> Result<(), RenderError>;
    /// Adapts the presentation surface to a new window size.
    fn resize(&mut self, width: u32, height: u32);
}
