//! julia-viewer - fly a camera around a Julia set rendered on the GPU
//!
//! A fullscreen quad is drawn with a fragment shader that iterates
//! `z = z² + mu` per pixel. The quad sits in 3D space, so the view can be moved
//! and turned with the keyboard while the iteration bound is tuned live.
//!
//! # Controls
//! - **W / S / A / D**: move forward, backward, left, right
//! - **Z / X**: move down, up
//! - **Arrow keys**: tilt and turn
//! - **+ / -**: more or fewer iterations
//! - **Escape**: quit
//!
//! # Architecture
//! - `app/`: winit application handler and window state
//! - `render_loop`: the per-frame controller
//! - `renderer/`: shader program and device traits and their wgpu implementation
//! - `camera`, `input/`, `fractal`, `timing`: state the loop updates each frame
//! - `math/`: vectors and column-major matrices
//!
//! # Usage
//! `cargo run --release -- [MU_X MU_Y] [--width W --height H] [--no-vsync]`

#![warn(missing_docs)]
pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod fractal;
pub mod input;
pub mod logging;
pub mod math;
pub mod render_loop;
pub mod renderer;
pub mod timing;

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> anyhow::Result<()> {
    let config = config::Config::parse();
    logging::init_tracing(&config.log);
    logging::install_panic_hook();

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("failed to install Ctrl-C handler")?;
    }

    let event_loop = EventLoop::new().map_err(error::InitError::from)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(config, interrupted);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.take_failure() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
