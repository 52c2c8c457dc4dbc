//! Uniform buffer utilities for the fractal shader.
//!
//! This module provides the [`FractalUniforms`] struct mirroring the WGSL uniform
//! block, name-based updates for it, and helpers for buffer and bind group creation.

use crate::error::ShaderError;
use crate::renderer::UniformValue;
use std::mem::{offset_of, size_of};
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Uniform name of the model-view-projection matrix.
pub const MVP: &str = "mvp";
/// Uniform name of the fractal constant.
pub const MU: &str = "mu";
/// Uniform name of the iteration bound.
pub const ITER: &str = "iter";

/// Uniforms for the fractal pipeline.
///
/// Matches this WGSL block, 80 bytes with std140-style alignment:
///
/// ```wgsl
/// struct Uniforms {
///     mvp: mat4x4<f32>,
///     mu: vec2<f32>,
///     iter: u32,
/// }
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FractalUniforms {
    /// Model-view-projection matrix, column-major.
    pub mvp: [[f32; 4]; 4],
    /// Julia constant.
    pub mu: [f32; 2],
    /// Maximum iterations per pixel.
    pub iter: u32,
    _padding: u32,
}

impl Default for FractalUniforms {
    fn default() -> Self {
        Self::new()
    }
}

impl FractalUniforms {
    /// Creates uniforms with an identity transform, `mu = 0` and one iteration.
    pub fn new() -> Self {
        Self {
            mvp: crate::math::Mat4::identity().into(),
            mu: [0.0; 2],
            iter: 1,
            _padding: 0,
        }
    }

    /// Returns the raw bytes of the uniform struct for uploading to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Stores `value` under `name` and returns the byte range that changed.
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<Range<usize>, ShaderError> {
        match (name, value) {
            (MVP, UniformValue::Mat4(matrix)) => {
                self.mvp = matrix.into();
                Ok(field_range(offset_of!(FractalUniforms, mvp), size_of::<[[f32; 4]; 4]>()))
            }
            (MU, UniformValue::Vec2(mu)) => {
                self.mu = mu;
                Ok(field_range(offset_of!(FractalUniforms, mu), size_of::<[f32; 2]>()))
            }
            (ITER, UniformValue::Uint(iter)) => {
                self.iter = iter;
                Ok(field_range(offset_of!(FractalUniforms, iter), size_of::<u32>()))
            }
            (MVP, _) => Err(uniform_type(name, "mat4x4<f32>")),
            (MU, _) => Err(uniform_type(name, "vec2<f32>")),
            (ITER, _) => Err(uniform_type(name, "u32")),
            _ => Err(ShaderError::UnknownUniform(name.to_string())),
        }
    }

    /// Creates a GPU buffer containing the uniform data.
    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fractal Uniform Buffer"),
            contents: self.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Creates a bind group for `buffer` at binding 0 of `layout`.
    pub fn create_bind_group(
        buffer: &wgpu::Buffer,
        layout: &wgpu::BindGroupLayout,
        device: &wgpu::Device,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("fractal_uniform_bind_group"),
        })
    }
}

fn field_range(offset: usize, size: usize) -> Range<usize> {
    offset..offset + size
}

fn uniform_type(name: &str, expected: &'static str) -> ShaderError {
    ShaderError::UniformType {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4;

    #[test]
    fn test_layout_matches_wgsl_block() {
        assert_eq!(size_of::<FractalUniforms>(), 80);
        assert_eq!(offset_of!(FractalUniforms, mu), 64);
        assert_eq!(offset_of!(FractalUniforms, iter), 72);
    }

    #[test]
    fn test_set_reports_changed_bytes() {
        let mut uniforms = FractalUniforms::new();

        let range = uniforms.set(MU, UniformValue::Vec2([0.25, -0.5])).unwrap();
        assert_eq!(range, 64..72);
        assert_eq!(uniforms.mu, [0.25, -0.5]);
        assert_eq!(
            &uniforms.as_bytes()[range],
            bytemuck::cast_slice::<f32, u8>(&[0.25, -0.5])
        );

        let range = uniforms.set(ITER, UniformValue::Uint(42)).unwrap();
        assert_eq!(range, 72..76);
        assert_eq!(uniforms.iter, 42);

        let mvp = Mat4::translation(1.0, 2.0, 3.0);
        let range = uniforms.set(MVP, mvp.into()).unwrap();
        assert_eq!(range, 0..64);
        assert_eq!(uniforms.mvp, mvp.0);
    }

    #[test]
    fn test_unknown_uniform_is_rejected() {
        let mut uniforms = FractalUniforms::new();
        let err = uniforms.set("zoom", UniformValue::Uint(1)).unwrap_err();
        assert!(matches!(err, ShaderError::UnknownUniform(name) if name == "zoom"));
    }

    #[test]
    fn test_wrong_value_kind_is_rejected() {
        let mut uniforms = FractalUniforms::new();
        let err = uniforms.set(ITER, UniformValue::Vec2([1.0, 1.0])).unwrap_err();
        assert!(matches!(err, ShaderError::UniformType { expected: "u32", .. }));
        assert_eq!(uniforms, FractalUniforms::new());
    }
}
