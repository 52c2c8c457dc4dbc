//! WGPU implementation of [`RenderDevice`].
//!
//! [`WgpuDevice`] owns the surface and its configuration and shares the device
//! and queue with the programs it creates through [`GpuContext`]. A frame is
//! started by [`RenderDevice::clear`], extended by
//! [`RenderDevice::draw_indexed`] and submitted by [`RenderDevice::present`].

use crate::error::{InitError, RenderError};
use crate::renderer::program::WgpuProgram;
use crate::renderer::{ClearColor, QuadGeometry, RenderDevice};
use std::rc::Rc;
use wgpu::util::DeviceExt;

/// Device handles shared between the renderer and its shader programs.
pub struct GpuContext {
    /// Logical device that owns every GPU object.
    pub device: wgpu::Device,
    /// Queue uniform writes and frames are submitted to.
    pub queue: wgpu::Queue,
    /// Format every pipeline renders into.
    pub surface_format: wgpu::TextureFormat,
}

/// Quad vertex and index buffers on the GPU. Destroyed on drop.
pub struct WgpuQuadBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl Drop for WgpuQuadBuffers {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        tracing::debug!("quad buffers released");
    }
}

/// A frame between `clear` and `present`.
struct PendingFrame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

/// [`RenderDevice`] presenting to a window surface.
pub struct WgpuDevice {
    gpu: Rc<GpuContext>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    frame: Option<PendingFrame>,
}

impl WgpuDevice {
    /// Picks an adapter for `surface`, opens a device and configures the surface.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<Self, InitError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or(InitError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, "using graphics adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Fractal Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let capabilities = surface.get_capabilities(&adapter);
        let format =
            choose_surface_format(&capabilities.formats).ok_or(InitError::UnsupportedSurface)?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);
        tracing::debug!(?format, width, height, vsync, "surface configured");

        Ok(Self {
            gpu: Rc::new(GpuContext {
                device,
                queue,
                surface_format: format,
            }),
            surface,
            surface_config,
            frame: None,
        })
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.gpu.device, &self.surface_config);
    }

    fn acquire_texture(&self) -> Result<wgpu::SurfaceTexture, RenderError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(err @ (wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost)) => {
                self.reconfigure();
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl RenderDevice for WgpuDevice {
    type Program = WgpuProgram;
    type Buffers = WgpuQuadBuffers;

    fn create_program(&mut self) -> WgpuProgram {
        WgpuProgram::new(Rc::clone(&self.gpu))
    }

    fn create_quad_buffers(&mut self, quad: &QuadGeometry) -> Result<WgpuQuadBuffers, RenderError> {
        let vertex_buffer = self
            .gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: quad.vertex_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Index Buffer"),
                contents: quad.index_bytes(),
                usage: wgpu::BufferUsages::INDEX,
            });

        Ok(WgpuQuadBuffers {
            vertex_buffer,
            index_buffer,
        })
    }

    fn clear(&mut self, color: ClearColor) -> Result<(), RenderError> {
        // An unpresented frame is dropped.
        self.frame = None;

        let surface_texture = self.acquire_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Fractal Frame Encoder"),
            });

        {
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }

        self.frame = Some(PendingFrame {
            surface_texture,
            view,
            encoder,
        });
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        program: &WgpuProgram,
        buffers: &WgpuQuadBuffers,
        index_count: u32,
    ) -> Result<(), RenderError> {
        let pipeline = program.pipeline()?;
        let bind_group = program.bind_group()?;
        let frame = self.frame.as_mut().ok_or(RenderError::FrameNotStarted)?;

        let mut fractal_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Fractal Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        fractal_pass.set_pipeline(pipeline);
        fractal_pass.set_bind_group(0, bind_group, &[]);
        fractal_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        fractal_pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        fractal_pass.draw_indexed(0..index_count, 0, 0..1);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let frame = self.frame.take().ok_or(RenderError::FrameNotStarted)?;
        self.gpu.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.surface_texture.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.frame = None;
        self.reconfigure();
        tracing::debug!(width, height, "surface resized");
    }
}

/// Prefers `Bgra8UnormSrgb`, then any sRGB format, then whatever comes first.
pub fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|&format| format == wgpu::TextureFormat::Bgra8UnormSrgb)
        .or_else(|| formats.iter().copied().find(|format| format.is_srgb()))
        .or_else(|| formats.first().copied())
}

/// Present mode for the `vsync` setting.
pub fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
