//! shader-preview - interactive preview of a GLSL shader pair
//!
//! # Usage
//!
//! ```bash
//! shader-preview
//! shader-preview --config preview.toml
//! shader-preview --vertex shaders/toon.vert --fragment shaders/toon.frag
//! shader-preview --texture bricks --extra bricks_normal --mesh teapot=meshes/teapot.obj
//! ```
//!
//! # Controls
//!
//! - Left drag: orbit, wheel: zoom
//! - M / D / N: next mesh, diffuse texture, normal map (Shift: previous)
//! - Space or P: pause
//! - Arrows, PageUp/PageDown: move the light, R: reset it

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use shader_preview::config::{MeshSource, PreviewConfig};

#[derive(Parser)]
#[command(name = "shader-preview")]
#[command(author, version, about = "Interactive preview of a GLSL vertex/fragment shader pair")]
struct Args {
    /// TOML configuration file; flags below override its values
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Root directory for textures, meshes and shaders
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Vertex shader, relative to the asset directory
    #[arg(long)]
    vertex: Option<PathBuf>,

    /// Fragment shader, relative to the asset directory
    #[arg(long)]
    fragment: Option<PathBuf>,

    /// Default (diffuse) texture name
    #[arg(long, short = 't')]
    texture: Option<String>,

    /// Additional texture names; replaces the configured list
    #[arg(long = "extra", short = 'e')]
    extra_textures: Vec<String>,

    /// Extra OBJ mesh as NAME=PATH, may be repeated
    #[arg(long = "mesh", short = 'm')]
    meshes: Vec<MeshSource>,
}

impl Args {
    fn into_config(self) -> Result<PreviewConfig> {
        let mut config = match &self.config {
            Some(path) => PreviewConfig::load(path)?,
            None => PreviewConfig::default(),
        };
        if let Some(assets) = self.assets {
            config.asset_dir = assets;
        }
        if let Some(vertex) = self.vertex {
            config.vertex_shader = vertex;
        }
        if let Some(fragment) = self.fragment {
            config.fragment_shader = fragment;
        }
        if let Some(texture) = self.texture {
            config.default_texture = texture;
        }
        if !self.extra_textures.is_empty() {
            config.extra_textures = self.extra_textures;
        }
        config.meshes.extend(self.meshes);
        Ok(config)
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    shader_preview::app::run(config)
}
