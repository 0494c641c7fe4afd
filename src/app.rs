//! Application event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`] of the preview. It creates the
//! window and GPU context, loads meshes and shaders, starts the texture
//! fetches and then forwards every input to the [`Session`]. Each redraw
//! advances the clock and renders one frame through the [`FrameLoop`].
//!
//! Texture bytes are fetched concurrently (on a tokio runtime natively, with
//! `spawn_local` on the web) and come back to the event loop as a
//! [`PreviewEvent`], so the session itself is only ever touched from the
//! event loop thread.

use std::{fmt::Debug, path::Path, sync::Arc};

use anyhow::Context as _;
use cgmath::Vector3;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::PreviewConfig,
    context::Context,
    data_structures::{
        model::{GpuMesh, MeshData},
        registry::MeshRegistry,
        texture::Texture,
    },
    frame::{FrameLoop, FrameOutcome},
    interaction::PointerInput,
    panel::ControlPanel,
    pipelines::preview::{ShaderSource, ShaderStage},
    resources::{self, mesh, texture::decode_texture},
    scene::SceneEvent,
    session::{Message, Session},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub(crate) enum PreviewEvent {
    #[allow(dead_code)]
    Initialized {
        ctx: Context,
        meshes: MeshRegistry<MeshData>,
    },
    #[allow(dead_code)]
    InitFailed(anyhow::Error),
    TextureFetched {
        name: String,
        bytes: Result<Vec<u8>, String>,
    },
}

impl Debug for PreviewEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { meshes, .. } => f
                .debug_struct("Initialized")
                .field("meshes", &meshes.keys())
                .finish(),
            Self::InitFailed(e) => f.debug_tuple("InitFailed").field(e).finish(),
            Self::TextureFetched { name, bytes } => f
                .debug_struct("TextureFetched")
                .field("name", name)
                .field("bytes", &bytes.as_ref().map(Vec::len))
                .finish(),
        }
    }
}

/// Everything that exists once the window and GPU are up.
#[derive(Debug)]
struct AppState {
    ctx: Context,
    session: Session<GpuMesh, Texture>,
    panel: ControlPanel,
    pointer: PointerInput,
    frame_loop: FrameLoop,
}

impl AppState {
    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        self.session
            .update(Message::Scene(SceneEvent::Resize { width, height }));
    }

    fn request_redraw(&self) {
        self.ctx.window().request_redraw();
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<PreviewEvent>,
    config: Arc<PreviewConfig>,
    state: Option<AppState>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<PreviewEvent>, config: PreviewConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime =
            tokio::runtime::Runtime::new().context("Could not start the async runtime")?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config: Arc::new(config),
            state: None,
            last_time: Instant::now(),
            error: None,
        })
    }

    /// Uploads the meshes, starts the texture fetches and creates the session.
    fn finish_init(&mut self, ctx: Context, meshes: MeshRegistry<MeshData>) {
        let meshes = meshes.map(|name, data| data.upload(name, &ctx.device));
        let light: Vector3<f32> = self.config.light_position.into();
        let session = Session::new(&self.config.texture_setup(), meshes, light, |name| {
            self.fetch_texture(name)
        });

        let mut state = AppState {
            ctx,
            session,
            panel: ControlPanel::new(light),
            pointer: PointerInput::new(),
            frame_loop: FrameLoop::new(),
        };
        let size = state.ctx.window().inner_size();
        state.resize(size.width, size.height);
        state.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(state);
    }

    /// Reads the texture file in the background and reports back through the
    /// event loop.
    fn fetch_texture(&self, name: &str) {
        let proxy = self.proxy.clone();
        let path = self.config.texture_path(name);
        let name = name.to_string();
        log::debug!("Fetching texture '{}' from {}", name, path.display());
        let fetch = async move {
            let bytes = resources::load_binary(&path)
                .await
                .map_err(|e| format!("{e:#}"));
            if proxy
                .send_event(PreviewEvent::TextureFetched { name, bytes })
                .is_err()
            {
                log::debug!("Event loop closed before a texture arrived");
            }
        };
        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn(fetch);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(fetch);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

/// Reads the shader pair, opens the GPU context and builds the CPU meshes.
async fn init(
    window: Arc<Window>,
    config: Arc<PreviewConfig>,
) -> anyhow::Result<(Context, MeshRegistry<MeshData>)> {
    let vertex = load_shader(&config, &config.vertex_shader, ShaderStage::Vertex).await?;
    let fragment = load_shader(&config, &config.fragment_shader, ShaderStage::Fragment).await?;
    let ctx = Context::new(window, &vertex, &fragment).await?;

    let mut meshes = mesh::builtin_meshes();
    let loads = config.meshes.iter().map(|source| {
        let path = config.asset_path(&source.path);
        async move { (source, mesh::load_obj(&path).await) }
    });
    for (source, loaded) in futures::future::join_all(loads).await {
        match loaded {
            Ok(data) => {
                log::info!(
                    "Loaded mesh '{}' ({} triangles)",
                    source.name,
                    data.triangle_count()
                );
                meshes.insert(source.name.clone(), data);
            }
            Err(e) => log::error!("Skipping mesh '{}': {e:#}", source.name),
        }
    }
    Ok((ctx, meshes))
}

async fn load_shader(
    config: &PreviewConfig,
    relative: &Path,
    stage: ShaderStage,
) -> anyhow::Result<ShaderSource> {
    let path = config.asset_path(relative);
    let code = resources::load_string(&path)
        .await
        .with_context(|| format!("Could not load {:?} shader", stage))?;
    Ok(ShaderSource::new(&path, code, stage))
}

impl ApplicationHandler<PreviewEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        #[allow(unused_mut)]
        let mut window_attributes =
            Window::default_attributes().with_title(self.config.window_title.clone());

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e).context("Could not create window")),
        };
        let init_future = init(window, self.config.clone());

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok((ctx, meshes)) => self.finish_init(ctx, meshes),
            Err(e) => self.fail(event_loop, e),
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((ctx, meshes)) => PreviewEvent::Initialized { ctx, meshes },
                    Err(e) => PreviewEvent::InitFailed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("Event loop closed during initialisation");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: PreviewEvent) {
        match event {
            PreviewEvent::Initialized { ctx, meshes } => self.finish_init(ctx, meshes),
            PreviewEvent::InitFailed(e) => self.fail(event_loop, e),
            PreviewEvent::TextureFetched { name, bytes } => {
                let Some(state) = &mut self.state else {
                    return;
                };
                let result = bytes.and_then(|bytes| {
                    decode_texture(&state.ctx.device, &state.ctx.queue, &name, &bytes)
                });
                if state.session.update(Message::TextureLoaded { name, result }) {
                    state.request_redraw();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if let Some(pointer) = state.pointer.translate(&event) {
            if state.session.update(Message::Pointer(pointer)) {
                state.request_redraw();
            }
        }

        if let Some(scene_event) =
            state
                .panel
                .handle_window_event(&event, state.session.scene(), state.session.options())
        {
            let was_paused = state.session.scene().paused;
            if state.session.update(Message::Scene(scene_event)) {
                log::info!("{}", state.panel.summary(state.session.scene()));
                if was_paused && !state.session.scene().paused {
                    // The time spent paused must not count as one long frame.
                    self.last_time = Instant::now();
                }
                state.request_redraw();
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.resize(size.width, size.height);
                state.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                state.frame_loop.tick(&mut state.session, dt);

                match state.frame_loop.render(&state.session, &mut state.ctx) {
                    Ok(FrameOutcome::Drawn) => {
                        let summary = state.panel.summary(state.session.scene());
                        state.ctx.set_status(&summary);
                    }
                    Ok(FrameOutcome::Fallback) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window().inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
                if !state.session.scene().paused {
                    state.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Opens the preview window and runs until it is closed.
pub fn run(config: PreviewConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = console_log::init_with_level(log::Level::Info);
    }

    let event_loop = EventLoop::<PreviewEvent>::with_user_event()
        .build()
        .context("Could not create the event loop")?;
    let mut app = App::new(&event_loop, config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
