//! shader-preview
//!
//! An interactive harness for previewing a GLSL vertex/fragment shader pair.
//! A mesh is drawn with the shaders under an orbiting camera, lit by a point
//! light, with a diffuse texture and a normal map bound. Mesh, textures, light
//! and pause state are changed from the keyboard while the window is open.
//! Runs natively and in the browser (WebGL).
//!
//! High-level modules
//! - `app`: winit event loop, window and asynchronous asset fetching
//! - `assets`: texture store tracking loading/ready/failed per name
//! - `camera`: orbit camera matrices
//! - `config`: `preview.toml` configuration
//! - `context`: window surface, device and the preview pipeline
//! - `data_structures`: vertices, CPU/GPU meshes, the mesh registry, textures
//! - `frame`: per-frame draw decision, uniforms and the frame loop
//! - `interaction`: pointer drag and wheel handling
//! - `panel`: keyboard control panel
//! - `pipelines`: uniform block layout and pipeline construction
//! - `resources`: file loading, built-in meshes, OBJ import, texture decoding
//! - `scene`: the scene record and its transitions
//! - `session`: the single state object fed by messages
//!

pub mod app;
pub mod assets;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod frame;
pub mod interaction;
pub mod panel;
pub mod pipelines;
pub mod resources;
pub mod scene;
pub mod session;

// Re-exports commonly used types for convenience in downstream code.
pub use config::PreviewConfig;
pub use error::PreviewError;
pub use frame::{FrameLoop, FramePlan, RenderBackend};
pub use session::{Message, Session};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    app::run(PreviewConfig::default())
        .map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
