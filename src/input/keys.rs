//! Keyboard handling for the viewer.
//!
//! This module defines the [`ViewerKey`] enum for abstracting viewer actions from physical keys,
//! [`KeyState`] for tracking which of them are held, and [`InputSnapshot`], the immutable
//! copy of that state handed to the input mapper once per frame.

use std::collections::HashSet;
use winit::keyboard;

/// Every action the viewer binds to a key.
///
/// Bindings are fixed:
///
/// | Key | Action |
/// |---|---|
/// | W / S | move forward / backward |
/// | A / D | strafe left / right |
/// | Z / X | move down / up |
/// | Arrow keys | tilt and turn the camera |
/// | `+` / `-` | more / fewer fractal iterations |
/// | Escape | quit |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerKey {
    /// Move along the camera's forward vector (W).
    MoveForward,
    /// Move against the camera's forward vector (S).
    MoveBackward,
    /// Move against the camera's right vector (A).
    StrafeLeft,
    /// Move along the camera's right vector (D).
    StrafeRight,
    /// Move down the world Y axis (Z).
    MoveDown,
    /// Move up the world Y axis (X).
    MoveUp,
    /// Tilt the view up (Up Arrow).
    LookUp,
    /// Tilt the view down (Down Arrow).
    LookDown,
    /// Turn left (Left Arrow).
    TurnLeft,
    /// Turn right (Right Arrow).
    TurnRight,
    /// Raise the iteration bound (`+`).
    MoreIterations,
    /// Lower the iteration bound (`-`).
    FewerIterations,
    /// Quit the viewer (Escape).
    Quit,
}

/// Tracks the set of currently held viewer keys.
///
/// Updated from key press and release events; read once per frame through
/// [`KeyState::snapshot`].
#[derive(Debug, Default)]
pub struct KeyState {
    pressed_keys: HashSet<ViewerKey>,
}

impl KeyState {
    /// Creates a state with no keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as held.
    pub fn press_key(&mut self, key: ViewerKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: ViewerKey) {
        self.pressed_keys.remove(&key);
    }

    /// Whether `key` is currently held.
    #[cfg(test)]
    pub fn is_pressed(&self, key: ViewerKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Releases every key, e.g. when the window loses focus and release events
    /// will never arrive.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// Copies the held keys into an [`InputSnapshot`].
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            held: self.pressed_keys.clone(),
        }
    }
}

/// Keys held at the moment the frame polled input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: HashSet<ViewerKey>,
}

impl InputSnapshot {
    /// A snapshot with no keys held.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `key` was held when the snapshot was taken.
    pub fn is_held(&self, key: ViewerKey) -> bool {
        self.held.contains(&key)
    }

    /// Whether no key was held.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<ViewerKey> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = ViewerKey>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`ViewerKey`] if it is bound.
///
/// Supports named keys (arrows, escape) and character keys (WASD, Z/X, `+`/`-`).
/// `=` also raises the iteration bound so `+` works without Shift.
pub fn winit_key_to_viewer_key(key: &keyboard::Key) -> Option<ViewerKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => ViewerKey::LookUp,
            ArrowDown => ViewerKey::LookDown,
            ArrowLeft => ViewerKey::TurnLeft,
            ArrowRight => ViewerKey::TurnRight,
            Escape => ViewerKey::Quit,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => ViewerKey::MoveForward,
            "s" => ViewerKey::MoveBackward,
            "a" => ViewerKey::StrafeLeft,
            "d" => ViewerKey::StrafeRight,
            "z" => ViewerKey::MoveDown,
            "x" => ViewerKey::MoveUp,
            "+" => ViewerKey::MoreIterations,
            "=" => ViewerKey::MoreIterations,
            "-" => ViewerKey::FewerIterations,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key, NamedKey};

    #[test]
    fn test_character_keys_ignore_case() {
        assert_eq!(
            winit_key_to_viewer_key(&Key::Character("W".into())),
            Some(ViewerKey::MoveForward)
        );
        assert_eq!(
            winit_key_to_viewer_key(&Key::Character("x".into())),
            Some(ViewerKey::MoveUp)
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(
            winit_key_to_viewer_key(&Key::Named(NamedKey::Escape)),
            Some(ViewerKey::Quit)
        );
        assert_eq!(
            winit_key_to_viewer_key(&Key::Named(NamedKey::ArrowLeft)),
            Some(ViewerKey::TurnLeft)
        );
        assert_eq!(winit_key_to_viewer_key(&Key::Named(NamedKey::Space)), None);
    }

    #[test]
    fn test_iteration_keys() {
        assert_eq!(
            winit_key_to_viewer_key(&Key::Character("+".into())),
            Some(ViewerKey::MoreIterations)
        );
        assert_eq!(
            winit_key_to_viewer_key(&Key::Character("-".into())),
            Some(ViewerKey::FewerIterations)
        );
        assert_eq!(winit_key_to_viewer_key(&Key::Character("q".into())), None);
    }

    #[test]
    fn test_snapshot_is_detached_from_key_state() {
        let mut keys = KeyState::new();
        keys.press_key(ViewerKey::MoveForward);
        let snapshot = keys.snapshot();
        keys.release_key(ViewerKey::MoveForward);

        assert!(snapshot.is_held(ViewerKey::MoveForward));
        assert!(!keys.is_pressed(ViewerKey::MoveForward));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut keys = KeyState::new();
        keys.press_key(ViewerKey::TurnLeft);
        keys.press_key(ViewerKey::MoveUp);
        keys.clear();
        assert!(keys.snapshot().is_empty());
    }
}
