//! The single state object of a preview session.
//!
//! [`Session`] owns the scene record, the interaction tracker, the texture
//! store and the mesh registry. All changes arrive as a [`Message`] through
//! [`Session::update`], so every mutation happens between two callbacks of the
//! host event loop and none of them interleave.

use cgmath::Vector3;

use crate::{
    assets::{self, AssetStore},
    data_structures::registry::MeshRegistry,
    frame::{self, FramePlan},
    interaction::{InteractionTracker, PointerEvent},
    scene::{SceneEvent, SceneOptions, SceneState},
};

/// Everything that can change a session.
#[derive(Debug)]
pub enum Message<H> {
    Scene(SceneEvent),
    Pointer(PointerEvent),
    TextureLoaded {
        name: String,
        result: Result<H, String>,
    },
}

/// Texture configuration fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSetup {
    pub default_texture: String,
    pub extra_textures: Vec<String>,
}

impl TextureSetup {
    pub fn names(&self) -> Vec<String> {
        assets::texture_names(&self.default_texture, &self.extra_textures)
    }

    pub fn default_normal(&self) -> String {
        assets::default_normal_texture(&self.default_texture, &self.extra_textures)
    }
}

#[derive(Debug)]
pub struct Session<G, H> {
    scene: SceneState,
    interaction: InteractionTracker,
    assets: AssetStore<H>,
    meshes: MeshRegistry<G>,
    options: SceneOptions,
    initial_light: Vector3<f32>,
}

impl<G, H> Session<G, H> {
    /// Starts a session and kicks off the texture loads.
    ///
    /// `request` is called once per distinct texture name and must arrange for
    /// a [`Message::TextureLoaded`] to arrive later.
    pub fn new(
        textures: &TextureSetup,
        meshes: MeshRegistry<G>,
        light_position: Vector3<f32>,
        request: impl FnMut(&str),
    ) -> Self {
        let names = textures.names();
        let assets = AssetStore::begin_load_all(names.iter().cloned(), request);
        let mesh = match meshes.first_key() {
            Some(key) => key.to_string(),
            None => {
                log::warn!("Mesh registry is empty, nothing can be drawn");
                String::new()
            }
        };
        let scene = SceneState::new(
            mesh,
            textures.default_texture.clone(),
            textures.default_normal(),
            light_position,
        );
        log::info!(
            "Session started with mesh '{}', diffuse '{}', normal '{}'",
            scene.selected_mesh_id,
            scene.diffuse_texture_id,
            scene.normal_texture_id
        );
        let options = SceneOptions {
            meshes: meshes.keys(),
            textures: names,
        };
        Self {
            scene,
            interaction: InteractionTracker::new(),
            assets,
            meshes,
            options,
            initial_light: light_position,
        }
    }

    /// Applies one message. Returns whether the next frame will look
    /// different, i.e. whether a redraw should be requested.
    pub fn update(&mut self, message: Message<H>) -> bool {
        match message {
            Message::Scene(event) => {
                let changes_frame = !matches!(event, SceneEvent::Tick(_));
                match self.scene.apply(event, &self.options) {
                    Ok(()) => changes_frame,
                    Err(e) => {
                        log::warn!("Rejected scene change: {e}");
                        false
                    }
                }
            }
            Message::Pointer(event) => self.interaction.handle(event),
            Message::TextureLoaded { name, result } => {
                self.assets.on_load_result(&name, result);
                true
            }
        }
    }

    pub fn plan_frame(&self) -> FramePlan<'_, G, H> {
        frame::plan_frame(
            &self.scene,
            self.interaction.state(),
            &self.assets,
            &self.meshes,
        )
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn interaction(&self) -> &InteractionTracker {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionTracker {
        &mut self.interaction
    }

    pub fn assets(&self) -> &AssetStore<H> {
        &self.assets
    }

    pub fn meshes(&self) -> &MeshRegistry<G> {
        &self.meshes
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Light position the session started with.
    pub fn initial_light(&self) -> Vector3<f32> {
        self.initial_light
    }
}
