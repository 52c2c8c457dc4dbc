//! Error types.
//!
//! Three families, matching how far a failure is allowed to travel:
//! - [`ShaderError`]: building or feeding the shader program. Fatal at startup.
//! - [`RenderError`]: a single frame could not be produced.
//! - [`InitError`]: anything that stops the viewer from starting.

use crate::renderer::ShaderStage;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while compiling, linking or feeding the shader program.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// A shader file could not be read.
    #[error("failed to read {stage} shader from {}", .path.display())]
    Read {
        /// Stage the file was meant for.
        stage: ShaderStage,
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// WGSL validation rejected a stage.
    #[error("{stage} shader failed to compile: {message}")]
    Compile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Validation message reported by the device.
        message: String,
    },

    /// The render pipeline could not be created from the compiled stages.
    #[error("shader program failed to link: {0}")]
    Link(String),

    /// Linking was attempted before this stage was compiled.
    #[error("shader program has no {0} stage")]
    MissingStage(ShaderStage),

    /// Uniforms or drawing were used before the program was linked.
    #[error("shader program used before finalize()")]
    NotFinalized,

    /// No uniform with this name exists in the program.
    #[error("unknown uniform `{0}`")]
    UnknownUniform(String),

    /// A uniform was given a value of the wrong shape.
    #[error("uniform `{name}` expects a {expected} value")]
    UniformType {
        /// Uniform name.
        name: String,
        /// Shape the uniform holds.
        expected: &'static str,
    },

    /// A vertex attribute cannot be expressed as a vertex format.
    #[error("unsupported vertex attribute `{name}`: {reason}")]
    UnsupportedAttribute {
        /// Attribute name.
        name: String,
        /// What makes it unsupported.
        reason: String,
    },
}

/// Failures while producing one frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The next surface texture could not be acquired.
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// A draw or present came before `clear`.
    #[error("draw issued before the frame was cleared")]
    FrameNotStarted,

    /// The shader program rejected a call.
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

impl RenderError {
    /// Whether skipping the frame is enough to recover.
    pub fn is_recoverable(&self) -> bool {
        use wgpu::SurfaceError::{Lost, Outdated, Timeout};

        matches!(self, RenderError::Surface(Outdated | Lost | Timeout))
    }
}

/// Failures that stop the viewer from starting.
#[derive(Debug, Error)]
pub enum InitError {
    /// winit could not create its event loop.
    #[error("failed to create event loop")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be opened.
    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    /// wgpu could not create a surface for the window.
    #[error("failed to create rendering surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No adapter can present to the surface.
    #[error("no GPU adapter is compatible with the window surface")]
    NoAdapter,

    /// The adapter refused to create a device.
    #[error("failed to create GPU device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The surface reports no texture formats.
    #[error("surface does not support any texture format")]
    UnsupportedSurface,

    /// The shader program could not be built.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// Setting up the first frame failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_loss_is_recoverable() {
        assert!(RenderError::Surface(wgpu::SurfaceError::Lost).is_recoverable());
        assert!(RenderError::Surface(wgpu::SurfaceError::Outdated).is_recoverable());
        assert!(!RenderError::Surface(wgpu::SurfaceError::OutOfMemory).is_recoverable());
        assert!(RenderError::Surface(wgpu::SurfaceError::Timeout).is_recoverable());
        assert!(!RenderError::FrameNotStarted.is_recoverable());
    }

    #[test]
    fn test_shader_errors_name_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            message: "expected `;`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fragment shader failed to compile: expected `;`"
        );
    }
}
