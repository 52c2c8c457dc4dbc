//! Command-line configuration.

use crate::logging::DEFAULT_FILTER;
use crate::render_loop::LoopSettings;
use crate::renderer::ShaderSource;
use clap::Parser;
use std::path::PathBuf;

const VERTEX_SHADER: &str = include_str!("../shaders/vertex.wgsl");
const FRAGMENT_SHADER: &str = include_str!("../shaders/fragment.wgsl");

/// Fly around a GPU-rendered Julia set
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "julia-viewer")]
pub struct Config {
    /// Window title
    #[arg(long, default_value = "Julia")]
    pub title: String,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Real part of the Julia constant
    #[arg(default_value_t = -0.8, allow_negative_numbers = true)]
    pub mu_x: f32,

    /// Imaginary part of the Julia constant
    #[arg(default_value_t = 0.156, allow_negative_numbers = true)]
    pub mu_y: f32,

    /// Present frames without waiting for vertical sync
    #[arg(long)]
    pub no_vsync: bool,

    /// WGSL vertex shader to use instead of the built-in one
    #[arg(long)]
    pub vertex_shader: Option<PathBuf>,

    /// WGSL fragment shader to use instead of the built-in one
    #[arg(long)]
    pub fragment_shader: Option<PathBuf>,

    /// Tracing filter, overridden by RUST_LOG
    #[arg(long, default_value = DEFAULT_FILTER)]
    pub log: String,
}

impl Config {
    /// Whether presentation waits for vertical sync.
    pub fn vsync(&self) -> bool {
        !self.no_vsync
    }

    /// The `--vertex-shader` file, or the built-in vertex shader.
    pub fn vertex_source(&self) -> ShaderSource {
        shader_source(self.vertex_shader.as_ref(), VERTEX_SHADER)
    }

    /// The `--fragment-shader` file, or the built-in fragment shader.
    pub fn fragment_source(&self) -> ShaderSource {
        shader_source(self.fragment_shader.as_ref(), FRAGMENT_SHADER)
    }

    /// Settings the render loop is built from.
    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            width: self.width,
            height: self.height,
            mu: [self.mu_x, self.mu_y],
            vertex_shader: self.vertex_source(),
            fragment_shader: self.fragment_source(),
        }
    }
}

fn shader_source(path: Option<&PathBuf>, embedded: &'static str) -> ShaderSource {
    match path {
        Some(path) => ShaderSource::File(path.clone()),
        None => ShaderSource::Embedded(embedded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["julia-viewer"]).unwrap();
        assert_eq!(config.title, "Julia");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!((config.mu_x, config.mu_y), (-0.8, 0.156));
        assert!(config.vsync());
        assert_eq!(config.log, DEFAULT_FILTER);
        assert_eq!(config.vertex_source(), ShaderSource::Embedded(VERTEX_SHADER));
        assert_eq!(
            config.fragment_source(),
            ShaderSource::Embedded(FRAGMENT_SHADER)
        );
    }

    #[test]
    fn test_negative_mu_is_accepted() {
        let config = Config::try_parse_from(["julia-viewer", "-0.4", "-0.6"]).unwrap();
        assert_eq!(config.loop_settings().mu, [-0.4, -0.6]);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(Config::try_parse_from(["julia-viewer", "--width", "0"]).is_err());
        assert!(Config::try_parse_from(["julia-viewer", "--height", "0"]).is_err());
    }

    #[test]
    fn test_shader_overrides_are_read_from_disk() {
        let config = Config::try_parse_from([
            "julia-viewer",
            "--fragment-shader",
            "custom.wgsl",
            "--no-vsync",
        ])
        .unwrap();

        assert!(!config.vsync());
        assert_eq!(config.vertex_source(), ShaderSource::Embedded(VERTEX_SHADER));
        assert_eq!(
            config.loop_settings().fragment_shader,
            ShaderSource::File(PathBuf::from("custom.wgsl"))
        );
    }

    #[test]
    fn test_embedded_shaders_declare_their_entry_points() {
        assert!(VERTEX_SHADER.contains("fn vs_main"));
        assert!(FRAGMENT_SHADER.contains("fn fs_main"));
        for source in [VERTEX_SHADER, FRAGMENT_SHADER] {
            assert!(source.contains("@group(0) @binding(0)"));
        }
    }
}
