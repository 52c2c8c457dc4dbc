//! Column-major 4x4 matrix type.

use crate::math::deg_to_rad;
use crate::math::vec::Vec3;

/// Column-major 4x4 matrix, laid out the way WGSL expects `mat4x4<f32>`.
///
/// `self.0[column][row]`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    /// The identity matrix.
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    pub fn perspective(
        field_of_view_y_in_radians: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Mat4 {
        let f = 1.0 / (field_of_view_y_in_radians * 0.5).tan();
        let range_reciprocal = 1.0 / (z_near - z_far);

        Mat4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, z_far * range_reciprocal, -1.0],
            [0.0, 0.0, z_far * z_near * range_reciprocal, 0.0],
        ])
    }

    /// Translation by `(tx, ty, tz)`.
    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    /// Scaling along each axis.
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation around the X axis, angle in degrees.
    pub fn rotation_x(angle_in_degrees: f32) -> Mat4 {
        let c = deg_to_rad(angle_in_degrees).cos();
        let s = deg_to_rad(angle_in_degrees).sin();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation around the Y axis, angle in degrees.
    pub fn rotation_y(angle_in_degrees: f32) -> Mat4 {
        let c = deg_to_rad(angle_in_degrees).cos();
        let s = deg_to_rad(angle_in_degrees).sin();
        Mat4([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Returns `self × b`.
    pub fn multiply(&self, b: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, column) in result.iter_mut().enumerate() {
            for (j, cell) in column.iter_mut().enumerate() {
                *cell = (0..4).map(|k| b.0[i][k] * self.0[k][j]).sum();
            }
        }
        Mat4(result)
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, column) in result.iter_mut().enumerate() {
            for (j, cell) in column.iter_mut().enumerate() {
                *cell = self.0[j][i];
            }
        }
        Mat4(result)
    }

    /// Applies the upper 3x3 part to a direction (`w = 0`).
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0][0] * v.x() + m[1][0] * v.y() + m[2][0] * v.z(),
            m[0][1] * v.x() + m[1][1] * v.y() + m[2][1] * v.z(),
            m[0][2] * v.x() + m[1][2] * v.y() + m[2][2] * v.z(),
        )
    }

    /// Element-wise comparison within `epsilon`.
    #[cfg(test)]
    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(matrix: [[f32; 4]; 4]) -> Self {
        Mat4(matrix)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}
