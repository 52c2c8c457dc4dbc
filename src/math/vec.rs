//! 3D vector type.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/*
Requirements for Memory Compatibility with WGPU:
   1. Standard layout (like C structs).
   2. Can be safely cast to [f32; 3] or bytes.
*/

/// A 3D vector of `f32` components `[x, y, z]`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3([f32; 3]);

impl Vec3 {
    /// The origin.
    pub const ZERO: Vec3 = Vec3([0.0, 0.0, 0.0]);
    /// World up, `+Y`.
    pub const UP: Vec3 = Vec3([0.0, 1.0, 0.0]);

    /// Creates a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3([x, y, z])
    }

    /// Dot product.
    #[cfg(test)]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    /// Euclidean length.
    #[cfg(test)]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Component-wise comparison within `epsilon`.
    #[cfg(test)]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// The X component.
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    /// The Y component.
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    /// The Z component.
    pub fn z(&self) -> f32 {
        self.0[2]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(values: [f32; 3]) -> Self {
        Vec3(values)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(vec: Vec3) -> Self {
        vec.0
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self([
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        ])
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self([
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ])
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self([-self.x(), -self.y(), -self.z()])
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self([self.x() * scalar, self.y() * scalar, self.z() * scalar])
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    fn mul(self, vec: Vec3) -> Vec3 {
        vec * self
    }
}
