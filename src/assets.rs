//! Texture load tracking.
//!
//! The set of texture names is fixed at startup. Each name starts out
//! [`AssetState::Loading`] and resolves exactly once to either
//! [`AssetState::Ready`] or [`AssetState::Failed`]. There is no retry and no
//! reload: a failed name stays failed for the whole session.
//!
//! The store is generic over the handle type `H` so the state machine does
//! not depend on a GPU. The application stores
//! [`Texture`](crate::data_structures::texture::Texture)s in it.

use std::collections::HashMap;

use crate::error::PreviewError;

#[derive(Debug, Clone, PartialEq)]
pub enum AssetState<H> {
    Loading,
    Ready(H),
    Failed(PreviewError),
}

impl<H> AssetState<H> {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, AssetState::Loading)
    }
}

#[derive(Debug)]
pub struct AssetStore<H> {
    entries: HashMap<String, AssetState<H>>,
    // Keeps the order in which the names were configured.
    names: Vec<String>,
}

impl<H> Default for AssetStore<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            names: Vec::new(),
        }
    }
}

impl<H> AssetStore<H> {
    /// Marks every distinct name as loading and calls `request` once per
    /// name. `request` is expected to start the asynchronous load whose
    /// outcome comes back through [`on_load_result`](Self::on_load_result).
    pub fn begin_load_all<I, S, F>(names: I, mut request: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&str),
    {
        let mut store = Self::default();
        for name in names {
            let name = name.into();
            if store.entries.contains_key(&name) {
                continue;
            }
            store.entries.insert(name.clone(), AssetState::Loading);
            request(&name);
            store.names.push(name);
        }
        log::info!("Loading {} textures: {:?}", store.names.len(), store.names);
        store
    }

    /// Records the outcome of one load.
    ///
    /// Results for names that were never requested, or that already resolved,
    /// are dropped.
    pub fn on_load_result(&mut self, name: &str, result: Result<H, String>) {
        let Some(entry) = self.entries.get_mut(name) else {
            log::debug!("Ignoring load result for unknown texture '{name}'");
            return;
        };
        if entry.is_resolved() {
            log::debug!("Texture '{name}' already resolved, ignoring late result");
            return;
        }
        *entry = match result {
            Ok(handle) => {
                log::info!("Texture '{name}' ready");
                AssetState::Ready(handle)
            }
            Err(reason) => {
                log::warn!("Texture '{name}' failed: {reason}");
                AssetState::Failed(PreviewError::TextureLoadFailed {
                    name: name.to_string(),
                    reason,
                })
            }
        };
    }

    /// The handle for `name`, only once it loaded successfully.
    pub fn lookup(&self, name: &str) -> Option<&H> {
        match self.entries.get(name) {
            Some(AssetState::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    pub fn state(&self, name: &str) -> Option<&AssetState<H>> {
        self.entries.get(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn pending(&self) -> usize {
        self.entries.values().filter(|s| !s.is_resolved()).count()
    }
}

/// Texture option list: the default name followed by the extra names, with
/// duplicates removed.
pub fn texture_names(default: &str, extras: &[String]) -> Vec<String> {
    let mut names = vec![default.to_string()];
    for extra in extras {
        if !names.contains(extra) {
            names.push(extra.clone());
        }
    }
    names
}

/// Picks the initial normal map: the first extra name that contains "norm"
/// in any letter case, or the default texture if none does.
///
/// This does not look at load state, so the pick may still be loading or may
/// have failed.
pub fn default_normal_texture(default: &str, extras: &[String]) -> String {
    extras
        .iter()
        .find(|name| name.to_lowercase().contains("norm"))
        .cloned()
        .unwrap_or_else(|| default.to_string())
}
