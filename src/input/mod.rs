//! Keyboard input: key bindings, held-key tracking and the mapping from held
//! keys to camera and fractal updates.

pub mod keys;
pub mod mapper;

pub use keys::{InputSnapshot, KeyState, ViewerKey, winit_key_to_viewer_key};
pub use mapper::InputMapper;
