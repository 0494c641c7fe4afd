//! Named mesh registry.
//!
//! Populated once at startup and never changed afterwards. The key order is
//! the insertion order and is what the mesh selector cycles through.

#[derive(Debug, Clone)]
pub struct MeshRegistry<G> {
    entries: Vec<(String, G)>,
}

impl<G> Default for MeshRegistry<G> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<G> MeshRegistry<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh. A second mesh with an existing name replaces the first
    /// one but keeps its position in the key order.
    pub fn insert(&mut self, name: impl Into<String>, geometry: G) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => {
                log::warn!("Mesh '{}' registered twice, keeping the last one", name);
                entry.1 = geometry;
            }
            None => self.entries.push((name, geometry)),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&G> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, geometry)| geometry)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts every geometry, e.g. to upload CPU meshes to the GPU.
    pub fn map<T>(self, mut f: impl FnMut(&str, G) -> T) -> MeshRegistry<T> {
        MeshRegistry {
            entries: self
                .entries
                .into_iter()
                .map(|(key, geometry)| {
                    let converted = f(&key, geometry);
                    (key, converted)
                })
                .collect(),
        }
    }
}
