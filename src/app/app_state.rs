//! AppState module.
//!
//! Defines [`AppState`], everything that exists once the window is open.

use crate::camera::FlyCamera;
use crate::config::Config;
use crate::error::{InitError, RenderError};
use crate::render_loop::{LoopEvent, LoopState, RenderLoop, WindowEvents};
use crate::renderer::wgpu_lib::WgpuDevice;
use crate::timing::SystemClock;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use winit::window::Window;

/// The concrete loop driven by the window.
pub type ViewerLoop = RenderLoop<WgpuDevice, FlyCamera, WindowEvents, SystemClock>;

/// The window and the loop rendering into it.
pub struct AppState {
    // Dropped before the window so the surface never outlives it.
    render_loop: ViewerLoop,
    window: Arc<Window>,
}

impl AppState {
    /// Creates the surface and device for `window` and builds the render loop.
    pub async fn new(
        instance: &wgpu::Instance,
        window: Arc<Window>,
        config: &Config,
        interrupted: Arc<AtomicBool>,
    ) -> Result<Self, InitError> {
        let surface = instance.create_surface(Arc::clone(&window))?;
        let size = window.inner_size();
        let (width, height) = if size.width > 0 && size.height > 0 {
            (size.width, size.height)
        } else {
            (config.width, config.height)
        };

        let device = WgpuDevice::new(instance, surface, width, height, config.vsync()).await?;
        let render_loop = RenderLoop::new(
            device,
            FlyCamera::new(),
            WindowEvents::new(interrupted),
            SystemClock::new(),
            config.loop_settings(),
        )?;

        Ok(Self {
            render_loop,
            window,
        })
    }

    /// The window being rendered into.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Queues a window event for the next iteration.
    pub fn push_event(&mut self, event: LoopEvent) {
        self.render_loop.events_mut().push(event);
    }

    /// Runs one iteration and asks for the next frame while still running.
    pub fn redraw(&mut self) -> Result<LoopState, RenderError> {
        let state = self.render_loop.step()?;
        if state == LoopState::Running {
            self.window.request_redraw();
        } else {
            tracing::info!(
                iterations = self.render_loop.fractal().iteration_count(),
                "viewer stopped"
            );
        }
        Ok(state)
    }
}
