//! Math utilities and types for the camera and the shader uniforms.
//!
//! This module provides the matrix and vector types used to build the
//! model-view-projection transform. All types are `bytemuck::Pod` so they can be
//! copied straight into a WGSL uniform block.
//!
//! # Module Organization
//!
//! - [`vec`] module contains the 3D vector type
//! - [`mat`] module contains the column-major 4x4 matrix type
//! - Angle conversions are provided at root level

pub mod mat;
pub mod vec;

pub use mat::Mat4;
pub use vec::Vec3;

/// Converts degrees to radians.
///
/// This handles angle wrapping by first normalizing the input to the range (-360, 360).
///
/// # Example
/// ```ignore
/// use crate::math::deg_to_rad;
///
/// assert_eq!(deg_to_rad(180.0), std::f32::consts::PI);
/// assert_eq!(deg_to_rad(540.0), std::f32::consts::PI);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    (degrees % 360.0) * (std::f32::consts::PI / 180.0)
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg_to_rad_wraps() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((deg_to_rad(540.0) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_degrees_negative_and_overflow() {
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(0.0), 0.0);
    }
}
