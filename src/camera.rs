//! Camera interface consumed by the render loop, and the fly-through camera
//! the viewer ships with.
//!
//! # Coordinate System
//!
//! Right-handed, looking down `-Z` at zero orientation:
//! - X-axis: right
//! - Y-axis: up
//! - Z-axis: towards the viewer
//!
//! Angles are measured in degrees:
//! - **Vertical angle**: up/down look angle, clamped to ±85°
//! - **Horizontal angle**: left/right look angle, wrapped to `[0, 360)`

use crate::math::{Mat4, Vec3, deg_to_rad, wrap_degrees};

/// Maximum vertical look angle in degrees, in either direction.
pub const MAX_VERTICAL_ANGLE: f32 = 85.0;

/// Everything the render loop and the input mapper need from a camera.
pub trait Camera {
    /// Combined view-projection matrix for the current state.
    fn matrix(&self) -> Mat4;
    /// Unit vector pointing where the camera looks.
    fn forward(&self) -> Vec3;
    /// Unit vector pointing to the camera's right.
    fn right(&self) -> Vec3;
    /// Moves the camera by `offset` in world space.
    fn offset_position(&mut self, offset: Vec3);
    /// Tilts by `up_angle` and turns by `right_angle`, both in degrees.
    fn offset_orientation(&mut self, up_angle: f32, right_angle: f32);
    /// Places the camera at `position`.
    fn set_position(&mut self, position: Vec3);
    /// Sets the width / height ratio used by the projection.
    fn set_viewport_aspect_ratio(&mut self, ratio: f32);
}

/// Free-flying perspective camera.
///
/// The view matrix is `orientation × translation(-position)` where the
/// orientation applies the horizontal turn first and the vertical tilt second.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    /// World position `[x, y, z]`.
    pub position: Vec3,
    /// Left/right turn in degrees, in `[0, 360)`.
    pub horizontal_angle: f32,
    /// Up/down tilt in degrees, in `[-85, 85]`. Positive values look down.
    pub vertical_angle: f32,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    /// Distance to the near clipping plane.
    pub near_plane: f32,
    /// Distance to the far clipping plane.
    pub far_plane: f32,
    /// Width / height ratio of the viewport.
    pub viewport_aspect_ratio: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FlyCamera {
    /// Creates a camera at the origin looking down `-Z`.
    ///
    /// Defaults: 50° field of view, planes at 0.01 and 100, 4:3 aspect ratio.
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            horizontal_angle: 0.0,
            vertical_angle: 0.0,
            field_of_view: 50.0,
            near_plane: 0.01,
            far_plane: 100.0,
            viewport_aspect_ratio: 4.0 / 3.0,
        }
    }

    /// Rotation part of the view transform.
    pub fn orientation(&self) -> Mat4 {
        Mat4::rotation_x(self.vertical_angle).multiply(&Mat4::rotation_y(self.horizontal_angle))
    }

    /// World-to-camera transform.
    pub fn view(&self) -> Mat4 {
        let translation = Mat4::translation(
            -self.position.x(),
            -self.position.y(),
            -self.position.z(),
        );
        self.orientation().multiply(&translation)
    }

    /// Perspective projection for the current field of view and planes.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(
            deg_to_rad(self.field_of_view),
            self.viewport_aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }

    fn normalize_angles(&mut self) {
        self.horizontal_angle = wrap_degrees(self.horizontal_angle);
        self.vertical_angle = self
            .vertical_angle
            .clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE);
    }
}

impl Camera for FlyCamera {
    fn matrix(&self) -> Mat4 {
        self.projection().multiply(&self.view())
    }

    fn forward(&self) -> Vec3 {
        // orientation is a pure rotation, its transpose is its inverse
        self.orientation()
            .transpose()
            .transform_direction(Vec3::new(0.0, 0.0, -1.0))
    }

    fn right(&self) -> Vec3 {
        self.orientation()
            .transpose()
            .transform_direction(Vec3::new(1.0, 0.0, 0.0))
    }

    fn offset_position(&mut self, offset: Vec3) {
        self.position += offset;
    }

    fn offset_orientation(&mut self, up_angle: f32, right_angle: f32) {
        self.horizontal_angle += right_angle;
        self.vertical_angle += up_angle;
        self.normalize_angles();
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_viewport_aspect_ratio(&mut self, ratio: f32) {
        if ratio > 0.0 {
            self.viewport_aspect_ratio = ratio;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn up(camera: &FlyCamera) -> Vec3 {
        camera
            .orientation()
            .transpose()
            .transform_direction(Vec3::UP)
    }

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let camera = FlyCamera::new();
        assert!(camera.forward().approx_eq(&Vec3::new(0.0, 0.0, -1.0), EPSILON));
        assert!(camera.right().approx_eq(&Vec3::new(1.0, 0.0, 0.0), EPSILON));
        assert!(up(&camera).approx_eq(&Vec3::UP, EPSILON));
    }

    #[test]
    fn test_turning_right_rotates_forward_towards_positive_x() {
        let mut camera = FlyCamera::new();
        camera.offset_orientation(0.0, 90.0);
        assert!(camera.forward().approx_eq(&Vec3::new(1.0, 0.0, 0.0), EPSILON));
    }

    #[test]
    fn test_positive_up_angle_tilts_view_downwards() {
        let mut camera = FlyCamera::new();
        camera.offset_orientation(30.0, 0.0);
        assert!(camera.forward().y() < 0.0);
        camera.offset_orientation(-60.0, 0.0);
        assert!(camera.forward().y() > 0.0);
    }

    #[test]
    fn test_vertical_angle_is_clamped() {
        let mut camera = FlyCamera::new();
        camera.offset_orientation(200.0, 0.0);
        assert_eq!(camera.vertical_angle, MAX_VERTICAL_ANGLE);
        camera.offset_orientation(-400.0, 0.0);
        assert_eq!(camera.vertical_angle, -MAX_VERTICAL_ANGLE);
    }

    #[test]
    fn test_horizontal_angle_wraps() {
        let mut camera = FlyCamera::new();
        camera.offset_orientation(0.0, -10.0);
        assert!((camera.horizontal_angle - 350.0).abs() < EPSILON);
        camera.offset_orientation(0.0, 20.0);
        assert!((camera.horizontal_angle - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_view_moves_world_opposite_to_camera() {
        let mut camera = FlyCamera::new();
        camera.set_position(Vec3::new(0.0, 0.0, 5.0));
        let view = camera.view();
        assert_eq!(view.0[3], [0.0, 0.0, -5.0, 1.0]);
    }

    #[test]
    fn test_aspect_ratio_rejects_non_positive_values() {
        let mut camera = FlyCamera::new();
        camera.set_viewport_aspect_ratio(0.0);
        assert_eq!(camera.viewport_aspect_ratio, 4.0 / 3.0);
        camera.set_viewport_aspect_ratio(2.0);
        assert_eq!(camera.viewport_aspect_ratio, 2.0);
    }
}
