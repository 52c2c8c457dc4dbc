//! Window and event-loop glue.
//!
//! # Module Structure
//!
//! - [`app_state`]: [`AppState`], the window plus the running [`RenderLoop`]
//! - [`event_handler`]: [`App`], the winit [`ApplicationHandler`] that feeds it
//!
//! # Event Flow
//!
//! 1. Window events are translated into [`LoopEvent`]s and queued
//! 2. `RedrawRequested` runs one loop iteration
//! 3. The next redraw is requested until the loop stops
//!
//! [`RenderLoop`]: crate::render_loop::RenderLoop
//! [`LoopEvent`]: crate::render_loop::LoopEvent
//! [`ApplicationHandler`]: winit::application::ApplicationHandler

pub mod app_state;
pub mod event_handler;

pub use app_state::AppState;
pub use event_handler::App;
