//! The viewer's frame loop.
//!
//! [`RenderLoop`] owns the camera, the shader program, the quad buffers, the
//! fractal state and the device. Each call to [`RenderLoop::step`] runs one
//! iteration: drain events, apply held keys, advance the clock, upload
//! uniforms, clear, draw and present.
//!
//! Everything platform specific sits behind [`RenderDevice`], [`EventSource`]
//! and [`Clock`], so the loop runs the same against a window or a script.

use crate::camera::Camera;
use crate::error::{InitError, RenderError};
use crate::fractal::FractalState;
use crate::input::{InputMapper, InputSnapshot, KeyState, ViewerKey};
use crate::math::{Mat4, Vec3};
use crate::renderer::uniform::{ITER, MU, MVP};
use crate::renderer::{
    ClearColor, QuadGeometry, RenderDevice, ShaderPipeline, ShaderSource, ShaderStage,
    VertexAttribute,
};
use crate::timing::{Clock, FrameClock};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where the camera starts, looking down -Z at the quad.
pub const START_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Something that happened to the window since the last iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopEvent {
    /// The window was closed or the process was interrupted.
    Closed,
    /// A bound key went down.
    KeyPressed(ViewerKey),
    /// A bound key went up.
    KeyReleased(ViewerKey),
    /// The drawable area changed size.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// The window lost keyboard focus.
    FocusLost,
}

/// Non-blocking event queue plus the current keyboard state.
pub trait EventSource {
    /// Next pending event, `None` once the queue is empty.
    fn poll_event(&mut self) -> Option<LoopEvent>;
    /// Keys held right now.
    fn snapshot(&self) -> InputSnapshot;
}

/// Whether the loop keeps iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// More iterations will follow.
    Running,
    /// A stop was requested. Further steps do nothing.
    Stopped,
}

/// What the loop needs to know to build its program and camera.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Initial viewport width, used for the aspect ratio.
    pub width: u32,
    /// Initial viewport height, used for the aspect ratio.
    pub height: u32,
    /// Julia constant `[re, im]`.
    pub mu: [f32; 2],
    /// Vertex stage source.
    pub vertex_shader: ShaderSource,
    /// Fragment stage source.
    pub fragment_shader: ShaderSource,
}

/// Per-frame controller tying the device, camera, events and clock together.
///
/// The clock's origin is taken on the first [`RenderLoop::step`], so time
/// spent building the loop is never reported as frame time.
pub struct RenderLoop<D: RenderDevice, C: Camera, E: EventSource, K: Clock> {
    buffers: D::Buffers,
    program: D::Program,
    device: D,
    camera: C,
    events: E,
    clock: FrameClock<K>,
    mapper: InputMapper,
    fractal: FractalState,
    model: Mat4,
    index_count: u32,
    state: LoopState,
    started: bool,
}

impl<D, C, E, K> RenderLoop<D, C, E, K>
where
    D: RenderDevice,
    C: Camera,
    E: EventSource,
    K: Clock,
{
    /// Builds the program and quad buffers and places the camera.
    ///
    /// Buffers already uploaded are released if a later step fails.
    pub fn new(
        mut device: D,
        mut camera: C,
        events: E,
        clock: K,
        settings: LoopSettings,
    ) -> Result<Self, InitError> {
        let quad = QuadGeometry::FULLSCREEN;

        let mut program = device.create_program();
        program.init();
        let buffers = device.create_quad_buffers(&quad)?;
        program.add_shader(settings.vertex_shader, ShaderStage::Vertex)?;
        program.add_shader(settings.fragment_shader, ShaderStage::Fragment)?;
        program.finalize()?;
        program.add_attribute(VertexAttribute::POSITION)?;

        camera.set_position(START_POSITION);
        camera.set_viewport_aspect_ratio(settings.width as f32 / settings.height as f32);

        let [x, y] = settings.mu;
        tracing::info!(
            mu.x = x,
            mu.y = y,
            width = settings.width,
            height = settings.height,
            "render loop ready"
        );

        Ok(Self {
            buffers,
            program,
            device,
            camera,
            events,
            clock: FrameClock::new(clock),
            mapper: InputMapper::default(),
            fractal: FractalState::new(x, y),
            model: Mat4::scaling(1.0, 1.0, 1.0),
            index_count: quad.index_count(),
            state: LoopState::Running,
            started: false,
        })
    }

    /// Whether the loop is still running.
    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Current fractal parameters.
    pub fn fractal(&self) -> &FractalState {
        &self.fractal
    }

    /// The event source, for feeding it between steps.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Runs one iteration and reports whether the loop should continue.
    ///
    /// A stop observed during the iteration still gets its frame drawn.
    /// Frames lost to an outdated or lost surface are skipped; any other
    /// render failure is returned.
    pub fn step(&mut self) -> Result<LoopState, RenderError> {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }
        if !self.started {
            self.clock.restart();
            self.started = true;
        }

        let current_elapsed = self.clock.now();
        self.process_events();

        let input = self.events.snapshot();
        let elapsed = self.clock.previous_elapsed().as_secs_f32();
        self.mapper
            .apply(&input, elapsed, &mut self.camera, &mut self.fractal);

        let timing = self.clock.advance(current_elapsed);
        if let Some(fps) = timing.fps() {
            tracing::trace!(fps, "frame");
        }

        match self.render_frame() {
            Ok(()) => {}
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "skipping frame");
            }
            Err(err) => return Err(err),
        }

        Ok(self.state)
    }

    /// Steps until the loop stops or a frame fails.
    #[cfg(test)]
    pub fn run(&mut self) -> Result<(), RenderError> {
        while self.step()? == LoopState::Running {}
        Ok(())
    }

    fn process_events(&mut self) {
        while let Some(event) = self.events.poll_event() {
            match event {
                LoopEvent::Closed | LoopEvent::KeyPressed(ViewerKey::Quit) => {
                    tracing::info!(?event, "stop requested");
                    self.state = LoopState::Stopped;
                    // whatever else was queued this frame is dropped
                    while self.events.poll_event().is_some() {}
                    return;
                }
                LoopEvent::Resized { width, height } => self.device.resize(width, height),
                LoopEvent::KeyPressed(_) | LoopEvent::KeyReleased(_) | LoopEvent::FocusLost => {}
            }
        }
    }

    fn render_frame(&mut self) -> Result<(), RenderError> {
        let mvp = self.camera.matrix().multiply(&self.model);
        self.program.add_uniform(MVP, mvp.into())?;
        self.program.add_uniform(MU, self.fractal.mu().into())?;
        self.program
            .add_uniform(ITER, self.fractal.iteration_count().into())?;

        self.device.clear(ClearColor::BACKGROUND)?;
        self.device
            .draw_indexed(&self.program, &self.buffers, self.index_count)?;
        self.device.present()
    }
}

/// [`EventSource`] fed by the window event handler.
///
/// Key events update the held-key state as they are pushed. An interrupt
/// flag, set from a Ctrl-C handler, is reported as [`LoopEvent::Closed`].
#[derive(Debug, Default)]
pub struct WindowEvents {
    queue: VecDeque<LoopEvent>,
    keys: KeyState,
    interrupted: Arc<AtomicBool>,
}

impl WindowEvents {
    /// Creates an empty queue reporting `interrupted` as a close.
    pub fn new(interrupted: Arc<AtomicBool>) -> Self {
        Self {
            queue: VecDeque::new(),
            keys: KeyState::new(),
            interrupted,
        }
    }

    /// Queues `event`, updating the held keys first.
    pub fn push(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::KeyPressed(key) => self.keys.press_key(key),
            LoopEvent::KeyReleased(key) => self.keys.release_key(key),
            LoopEvent::FocusLost => self.keys.clear(),
            LoopEvent::Closed | LoopEvent::Resized { .. } => {}
        }
        self.queue.push_back(event);
    }
}

impl EventSource for WindowEvents {
    fn poll_event(&mut self) -> Option<LoopEvent> {
        if self.interrupted.swap(false, Ordering::SeqCst) {
            return Some(LoopEvent::Closed);
        }
        self.queue.pop_front()
    }

    fn snapshot(&self) -> InputSnapshot {
        self.keys.snapshot()
    }
}
