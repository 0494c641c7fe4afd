//! Startup configuration (`preview.toml`).
//!
//! Every field has a default, so an empty file (or no file) previews the
//! bundled checker textures with the bundled shaders.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::session::TextureSetup;

/// An OBJ mesh added to the selector after the built-in meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSource {
    pub name: String,
    /// Relative to `asset_dir`.
    pub path: PathBuf,
}

/// Parses `name=path`, as given on the command line.
impl FromStr for MeshSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
                Ok(MeshSource {
                    name: name.trim().to_string(),
                    path: PathBuf::from(path.trim()),
                })
            }
            _ => Err(format!("expected NAME=PATH, got '{s}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Root that textures, meshes and shaders are resolved against.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    #[serde(default = "default_texture")]
    pub default_texture: String,
    #[serde(default = "default_extra_textures")]
    pub extra_textures: Vec<String>,
    /// Appended to a texture name to form its file name.
    #[serde(default = "default_texture_extension")]
    pub texture_extension: String,
    /// GLSL vertex shader (`.wgsl` files are read as WGSL).
    #[serde(default = "default_vertex_shader")]
    pub vertex_shader: PathBuf,
    #[serde(default = "default_fragment_shader")]
    pub fragment_shader: PathBuf,
    #[serde(default = "default_light_position")]
    pub light_position: [f32; 3],
    #[serde(default)]
    pub meshes: Vec<MeshSource>,
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}
fn default_texture() -> String {
    "checker".to_string()
}
fn default_extra_textures() -> Vec<String> {
    vec!["checker_normal".to_string()]
}
fn default_texture_extension() -> String {
    "png".to_string()
}
fn default_vertex_shader() -> PathBuf {
    PathBuf::from("shaders/preview.vert")
}
fn default_fragment_shader() -> PathBuf {
    PathBuf::from("shaders/preview.frag")
}
fn default_light_position() -> [f32; 3] {
    [2.0, 3.0, 4.0]
}
fn default_window_title() -> String {
    "shader-preview".to_string()
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            default_texture: default_texture(),
            extra_textures: default_extra_textures(),
            texture_extension: default_texture_extension(),
            vertex_shader: default_vertex_shader(),
            fragment_shader: default_fragment_shader(),
            light_position: default_light_position(),
            meshes: Vec::new(),
            window_title: default_window_title(),
        }
    }
}

impl PreviewConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Invalid preview configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn texture_setup(&self) -> TextureSetup {
        TextureSetup {
            default_texture: self.default_texture.clone(),
            extra_textures: self.extra_textures.clone(),
        }
    }

    /// File a texture name is loaded from.
    pub fn texture_path(&self, name: &str) -> PathBuf {
        let file = if self.texture_extension.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, self.texture_extension)
        };
        self.asset_dir.join("textures").join(file)
    }

    pub fn asset_path(&self, relative: &Path) -> PathBuf {
        self.asset_dir.join(relative)
    }
}
