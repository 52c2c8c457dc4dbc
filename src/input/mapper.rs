//! Translation of held keys into camera and fractal changes.

use crate::camera::Camera;
use crate::fractal::FractalState;
use crate::input::keys::{InputSnapshot, ViewerKey};
use crate::math::Vec3;

/// World units travelled per second of `elapsed` while a movement key is held.
pub const MOVE_SPEED: f32 = 0.01;
/// Degrees turned per poll while a rotation key is held.
pub const ROTATION_SPEED: f32 = 0.1;

/// Stateless mapping from an [`InputSnapshot`] to camera and fractal updates.
///
/// Translation is scaled by `elapsed × move_speed`. Rotation is a fixed
/// increment per call and ignores `elapsed`. Every held key applies its effect
/// independently, in a fixed order: forward axis, side axis, vertical axis,
/// tilt, turn, iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputMapper {
    /// World units per second of `elapsed`.
    pub move_speed: f32,
    /// Degrees per call.
    pub rotation_speed: f32,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            rotation_speed: ROTATION_SPEED,
        }
    }
}

impl InputMapper {
    /// Creates a mapper with explicit speeds.
    #[cfg(test)]
    pub fn new(move_speed: f32, rotation_speed: f32) -> Self {
        Self {
            move_speed,
            rotation_speed,
        }
    }

    /// Applies every held key in `input` to `camera` and `fractal`.
    pub fn apply<C: Camera + ?Sized>(
        &self,
        input: &InputSnapshot,
        elapsed: f32,
        camera: &mut C,
        fractal: &mut FractalState,
    ) {
        let step = elapsed * self.move_speed;

        // Z-axis
        if input.is_held(ViewerKey::MoveBackward) {
            camera.offset_position(step * -camera.forward());
        }
        if input.is_held(ViewerKey::MoveForward) {
            camera.offset_position(step * camera.forward());
        }

        // X-axis
        if input.is_held(ViewerKey::StrafeLeft) {
            camera.offset_position(step * -camera.right());
        }
        if input.is_held(ViewerKey::StrafeRight) {
            camera.offset_position(step * camera.right());
        }

        // Y-axis
        if input.is_held(ViewerKey::MoveDown) {
            camera.offset_position(step * -Vec3::UP);
        }
        if input.is_held(ViewerKey::MoveUp) {
            camera.offset_position(step * Vec3::UP);
        }

        // Rotation around X-axis
        if input.is_held(ViewerKey::LookUp) {
            camera.offset_orientation(-self.rotation_speed, 0.0);
        }
        if input.is_held(ViewerKey::LookDown) {
            camera.offset_orientation(self.rotation_speed, 0.0);
        }

        // Rotation around Y-axis
        if input.is_held(ViewerKey::TurnLeft) {
            camera.offset_orientation(0.0, -self.rotation_speed);
        }
        if input.is_held(ViewerKey::TurnRight) {
            camera.offset_orientation(0.0, self.rotation_speed);
        }

        if input.is_held(ViewerKey::MoreIterations) {
            fractal.increment_iterations();
        }
        if input.is_held(ViewerKey::FewerIterations) {
            fractal.decrement_iterations();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::math::Mat4;

    /// Camera double that records every call and never moves its axes.
    #[derive(Debug, Default)]
    pub(crate) struct StubCamera {
        pub matrix: Mat4,
        pub forward: Vec3,
        pub right: Vec3,
        pub position_offsets: Vec<Vec3>,
        pub orientation_offsets: Vec<(f32, f32)>,
        pub position: Option<Vec3>,
        pub aspect_ratio: Option<f32>,
    }

    impl StubCamera {
        pub(crate) fn new() -> Self {
            Self {
                matrix: Mat4::identity(),
                forward: Vec3::new(0.0, 0.0, -1.0),
                right: Vec3::new(1.0, 0.0, 0.0),
                ..Self::default()
            }
        }
    }

    impl Camera for StubCamera {
        fn matrix(&self) -> Mat4 {
            self.matrix
        }
        fn forward(&self) -> Vec3 {
            self.forward
        }
        fn right(&self) -> Vec3 {
            self.right
        }
        fn offset_position(&mut self, offset: Vec3) {
            self.position_offsets.push(offset);
        }
        fn offset_orientation(&mut self, up_angle: f32, right_angle: f32) {
            self.orientation_offsets.push((up_angle, right_angle));
        }
        fn set_position(&mut self, position: Vec3) {
            self.position = Some(position);
        }
        fn set_viewport_aspect_ratio(&mut self, ratio: f32) {
            self.aspect_ratio = Some(ratio);
        }
    }

    fn held(keys: &[ViewerKey]) -> InputSnapshot {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_forward_offset_is_scaled_by_elapsed_and_speed() {
        let mut camera = StubCamera::new();
        let mut fractal = FractalState::new(0.0, 0.0);

        InputMapper::default().apply(
            &held(&[ViewerKey::MoveForward]),
            0.5,
            &mut camera,
            &mut fractal,
        );

        assert_eq!(camera.position_offsets.len(), 1);
        let expected = camera.forward * (0.5 * 0.01);
        assert!(camera.position_offsets[0].approx_eq(&expected, 1e-9));
    }

    #[test]
    fn test_vertical_axis_uses_world_up() {
        let mut camera = StubCamera::new();
        let mut fractal = FractalState::new(0.0, 0.0);

        InputMapper::new(1.0, 0.1).apply(
            &held(&[ViewerKey::MoveUp, ViewerKey::MoveDown]),
            2.0,
            &mut camera,
            &mut fractal,
        );

        assert_eq!(
            camera.position_offsets,
            vec![Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 2.0, 0.0)]
        );
    }

    #[test]
    fn test_rotation_ignores_elapsed() {
        let mut camera = StubCamera::new();
        let mut fractal = FractalState::new(0.0, 0.0);
        let keys = held(&[ViewerKey::LookUp, ViewerKey::TurnRight]);

        InputMapper::default().apply(&keys, 0.0, &mut camera, &mut fractal);
        InputMapper::default().apply(&keys, 100.0, &mut camera, &mut fractal);

        assert_eq!(
            camera.orientation_offsets,
            vec![
                (-ROTATION_SPEED, 0.0),
                (0.0, ROTATION_SPEED),
                (-ROTATION_SPEED, 0.0),
                (0.0, ROTATION_SPEED),
            ]
        );
    }

    #[test]
    fn test_all_held_keys_apply_in_one_poll() {
        let mut camera = StubCamera::new();
        let mut fractal = FractalState::new(0.0, 0.0);
        let keys = held(&[
            ViewerKey::MoveForward,
            ViewerKey::MoveBackward,
            ViewerKey::StrafeLeft,
            ViewerKey::StrafeRight,
            ViewerKey::LookDown,
            ViewerKey::TurnLeft,
            ViewerKey::MoreIterations,
        ]);

        InputMapper::default().apply(&keys, 1.0, &mut camera, &mut fractal);

        assert_eq!(camera.position_offsets.len(), 4);
        assert_eq!(
            camera.orientation_offsets,
            vec![(ROTATION_SPEED, 0.0), (0.0, -ROTATION_SPEED)]
        );
        assert_eq!(fractal.iteration_count(), 11);
    }

    #[test]
    fn test_iteration_keys_respect_lower_bound() {
        let mut camera = StubCamera::new();
        let mut fractal = FractalState::new(0.0, 0.0);
        let mapper = InputMapper::default();

        for _ in 0..15 {
            mapper.apply(&held(&[ViewerKey::FewerIterations]), 0.016, &mut camera, &mut fractal);
        }
        assert_eq!(fractal.iteration_count(), 1);

        for _ in 0..3 {
            mapper.apply(&held(&[ViewerKey::MoreIterations]), 0.016, &mut camera, &mut fractal);
        }
        assert_eq!(fractal.iteration_count(), 4);
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let frames = [
            (held(&[ViewerKey::MoveForward, ViewerKey::TurnLeft]), 0.1),
            (held(&[ViewerKey::StrafeRight, ViewerKey::FewerIterations]), 0.25),
            (held(&[]), 0.3),
            (held(&[ViewerKey::MoveUp, ViewerKey::MoreIterations]), 0.05),
        ];

        let run = || {
            let mut camera = StubCamera::new();
            let mut fractal = FractalState::new(0.3, -0.4);
            let mut states = Vec::new();
            for (keys, elapsed) in &frames {
                InputMapper::default().apply(keys, *elapsed, &mut camera, &mut fractal);
                states.push(fractal);
            }
            (camera.position_offsets, camera.orientation_offsets, states)
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_empty_snapshot_changes_nothing() {
        let mut camera = StubCamera::new();
        let mut fractal = FractalState::new(0.0, 0.0);

        InputMapper::default().apply(&InputSnapshot::empty(), 1.0, &mut camera, &mut fractal);

        assert!(camera.position_offsets.is_empty());
        assert!(camera.orientation_offsets.is_empty());
        assert_eq!(fractal, FractalState::new(0.0, 0.0));
    }
}
