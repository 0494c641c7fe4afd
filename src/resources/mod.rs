//! Loading of shaders, textures and meshes from the asset directory.
//!
//! Natively files are read from disk with `tokio::fs`; on the web they are
//! fetched relative to the page origin with `reqwest`.

use std::path::Path;

use anyhow::Context;

pub mod mesh;
pub mod texture;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &Path) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page has no origin"))?;
    let base = reqwest::Url::parse(&format!("{}/", origin))?;
    Ok(base.join(&file_name.to_string_lossy())?)
}

pub async fn load_string(path: &Path) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(path)?;
        reqwest::get(url).await?.error_for_status()?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;

    Ok(txt)
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(path)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;

    Ok(data)
}
