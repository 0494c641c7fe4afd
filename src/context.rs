use std::{collections::HashMap, iter, sync::Arc};

use anyhow::{Context as _, anyhow};
use bytemuck::Zeroable;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    data_structures::{model::GpuMesh, texture::Texture},
    frame::{Diagnostic, DrawCall, DrawSettings, RenderBackend},
    pipelines::preview::{self, ShaderSource, UniformsRaw},
    resources::texture::{diffuse_normal_bind_group, diffuse_normal_layout},
};

pub const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.12,
    a: 1.0,
};

/// Shown instead of the mesh while resources are missing.
pub const FALLBACK_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.35,
    g: 0.12,
    b: 0.12,
    a: 1.0,
};

/// Window, surface and GPU objects of the preview.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    // Keyed by (diffuse, normal) texture name.
    texture_bind_groups: HashMap<(String, String), wgpu::BindGroup>,
    base_title: String,
    status: String,
    is_surface_configured: bool,
}

impl Context {
    pub async fn new(
        window: Arc<Window>,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Could not open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders write linear colour, so an sRGB surface is preferred.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[UniformsRaw::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_layout = preview::uniform_layout(&device);
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });
        let texture_layout = diffuse_normal_layout(&device);

        log::info!(
            "Compiling shaders {} and {}",
            vertex.label,
            fragment.label
        );
        let pipeline = preview::mk_preview_pipeline(
            &device,
            config.format,
            &uniform_layout,
            &texture_layout,
            vertex,
            fragment,
            DrawSettings::default(),
        );

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");
        let is_surface_configured = size.width > 0 && size.height > 0;
        if is_surface_configured {
            surface.configure(&device, &config);
        }
        let base_title = window.title();

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            pipeline,
            texture_bind_groups: HashMap::new(),
            base_title,
            status: String::new(),
            is_surface_configured,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigures the surface. Zero sized windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.is_surface_configured = true;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                [self.config.width, self.config.height],
                "depth_texture",
            );
        }
    }

    /// Appends a status line to the window title, if it changed.
    pub fn set_status(&mut self, status: &str) {
        if self.status != status {
            self.status = status.to_string();
            self.window
                .set_title(&format!("{} | {}", self.base_title, self.status));
        }
    }

    fn clear_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        colour: wgpu::Color,
    ) -> wgpu::RenderPass<'static> {
        encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Preview Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            })
            .forget_lifetime()
    }
}

impl RenderBackend for Context {
    type Geometry = GpuMesh;
    type Texture = Texture;
    type Error = wgpu::SurfaceError;

    fn draw(&mut self, call: &DrawCall<'_, GpuMesh, Texture>) -> Result<(), wgpu::SurfaceError> {
        if !self.is_surface_configured {
            return Ok(());
        }
        let raw = UniformsRaw::from(&call.uniforms);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[raw]));

        let key = (call.diffuse_id.to_string(), call.normal_id.to_string());
        if !self.texture_bind_groups.contains_key(&key) {
            let label = format!("{}+{}", key.0, key.1);
            let bind_group = diffuse_normal_bind_group(
                &self.device,
                &self.texture_layout,
                call.uniforms.diffuse_texture,
                call.uniforms.normal_texture,
                &label,
            );
            self.texture_bind_groups.insert(key.clone(), bind_group);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = self.clear_pass(&mut encoder, &view, CLEAR_COLOUR);
            let mesh = call.geometry;
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.texture_bind_groups[&key], &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
        }
        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn fallback(&mut self, diagnostic: &Diagnostic) -> Result<(), wgpu::SurfaceError> {
        self.set_status(&diagnostic.to_string());
        if !self.is_surface_configured {
            return Ok(());
        }
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Fallback Encoder"),
            });
        drop(self.clear_pass(&mut encoder, &view, FALLBACK_COLOUR));
        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
