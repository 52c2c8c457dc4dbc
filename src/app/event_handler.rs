//! Event handler module.
//!
//! Contains the [`App`] struct and its winit event handling.

use crate::app::app_state::AppState;
use crate::config::Config;
use crate::error::InitError;
use crate::input::winit_key_to_viewer_key;
use crate::render_loop::{LoopEvent, LoopState};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Owns the wgpu instance and, once the window exists, the [`AppState`].
///
/// # Lifecycle
/// 1. Created with [`App::new`], which creates the wgpu instance
/// 2. `resumed` opens the window and builds the [`AppState`]
/// 3. Window events are forwarded to the render loop
/// 4. The event loop exits when the render loop stops or fails
pub struct App {
    instance: wgpu::Instance,
    config: Config,
    interrupted: Arc<AtomicBool>,
    state: Option<AppState>,
    failure: Option<anyhow::Error>,
}

impl App {
    /// `interrupted` is the flag set by the Ctrl-C handler.
    pub fn new(config: Config, interrupted: Arc<AtomicBool>) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            config,
            interrupted,
            state: None,
            failure: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = event_loop
            .create_window(attributes)
            .map_err(InitError::from)?;
        let window = Arc::new(window);

        let state = pollster::block_on(AppState::new(
            &self.instance,
            Arc::clone(&window),
            &self.config,
            Arc::clone(&self.interrupted),
        ))?;
        window.request_redraw();
        Ok(state)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!(error = %format!("{error:#}"), "viewer failed");
        self.state = None;
        self.failure = Some(error);
        event_loop.exit();
    }

    fn handle_keyboard(&mut self, event: &KeyEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(key) = winit_key_to_viewer_key(&event.logical_key) else {
            return;
        };

        match event.state {
            ElementState::Pressed if !event.repeat => state.push_event(LoopEvent::KeyPressed(key)),
            ElementState::Pressed => {}
            ElementState::Released => state.push_event(LoopEvent::KeyReleased(key)),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.open_window(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, err.context("failed to start the viewer")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_keyboard(&event),
            WindowEvent::RedrawRequested => {
                let Some(state) = self.state.as_mut() else {
                    return;
                };
                match state.redraw() {
                    Ok(LoopState::Running) => {}
                    Ok(LoopState::Stopped) => {
                        self.state = None;
                        event_loop.exit();
                    }
                    Err(err) => self.fail(event_loop, err.into()),
                }
            }
            other => {
                let Some(state) = self.state.as_mut() else {
                    return;
                };
                match other {
                    WindowEvent::CloseRequested => state.push_event(LoopEvent::Closed),
                    WindowEvent::Resized(size) => state.push_event(LoopEvent::Resized {
                        width: size.width,
                        height: size.height,
                    }),
                    WindowEvent::Focused(false) => state.push_event(LoopEvent::FocusLost),
                    _ => {}
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // redraws stall while the window is occluded; Ctrl-C must still get through
        if let Some(state) = &self.state {
            state.window().request_redraw();
        }
    }
}
