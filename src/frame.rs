//! Per-frame rendering decisions.
//!
//! Each frame resolves the selected textures and mesh. If all three are
//! available a single draw call is issued with freshly computed
//! [`Uniforms`]; otherwise the backend is asked to show a [`Diagnostic`]
//! naming what is missing and nothing is drawn.
//!
//! [`plan_frame`] is the pure decision, [`FrameLoop`] feeds it to a
//! [`RenderBackend`].

use std::{fmt, time::Duration};

use cgmath::{Matrix3, Matrix4, Point3, SquareMatrix, Vector3};

use crate::{
    assets::{AssetState, AssetStore},
    camera::{self, CameraMatrices},
    data_structures::registry::MeshRegistry,
    error::PreviewError,
    interaction::InteractionState,
    scene::{SceneEvent, SceneState},
    session::{Message, Session},
};

/// Depth comparison of the draw call. `Less` is the default depth test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthTest {
    #[default]
    Less,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullFace {
    Front,
    Back,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSettings {
    pub depth_test: DepthTest,
    pub cull_face: CullFace,
}

impl Default for DrawSettings {
    /// Default depth testing, front faces culled.
    fn default() -> Self {
        Self {
            depth_test: DepthTest::Less,
            cull_face: CullFace::Front,
        }
    }
}

/// Everything the shader pair receives for one draw.
#[derive(Debug, Clone)]
pub struct Uniforms<'a, H> {
    pub projection: Matrix4<f32>,
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
    pub model_view_projection: Matrix4<f32>,
    /// Identity, valid only because the model matrix is.
    pub normal: Matrix3<f32>,
    pub light_position_view_space: Vector3<f32>,
    pub camera_position_world_space: Point3<f32>,
    pub diffuse_texture: &'a H,
    pub normal_texture: &'a H,
}

impl<'a, H> Uniforms<'a, H> {
    pub fn new(
        camera: &CameraMatrices,
        light_position: Vector3<f32>,
        diffuse_texture: &'a H,
        normal_texture: &'a H,
    ) -> Self {
        let model = camera::model_matrix();
        let model_view = camera.view * model;
        Self {
            projection: camera.projection,
            model,
            view: camera.view,
            model_view,
            model_view_projection: camera.projection * model_view,
            normal: Matrix3::identity(),
            light_position_view_space: (camera.view * light_position.extend(1.0)).truncate(),
            camera_position_world_space: camera.position,
            diffuse_texture,
            normal_texture,
        }
    }
}

pub struct DrawCall<'a, G, H> {
    pub mesh_id: &'a str,
    pub diffuse_id: &'a str,
    pub normal_id: &'a str,
    pub geometry: &'a G,
    pub uniforms: Uniforms<'a, H>,
    pub settings: DrawSettings,
    /// Set when the viewport aspect was invalid and 1.0 was used instead.
    pub aspect_error: Option<PreviewError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRole {
    DiffuseTexture,
    NormalTexture,
    Mesh,
}

impl fmt::Display for ResourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceRole::DiffuseTexture => "diffuse texture",
            ResourceRole::NormalTexture => "normal texture",
            ResourceRole::Mesh => "mesh",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MissingReason {
    Loading,
    Unavailable(PreviewError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissingResource {
    pub role: ResourceRole,
    pub name: String,
    pub reason: MissingReason,
}

impl fmt::Display for MissingResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            MissingReason::Loading => write!(f, "{} '{}' is still loading", self.role, self.name),
            MissingReason::Unavailable(e) => write!(f, "{} unavailable: {}", self.role, e),
        }
    }
}

/// Why a frame could not be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub missing: Vec<MissingResource>,
}

impl Diagnostic {
    pub fn is_loading_only(&self) -> bool {
        self.missing
            .iter()
            .all(|m| matches!(m.reason, MissingReason::Loading))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, missing) in self.missing.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", missing)?;
        }
        Ok(())
    }
}

pub enum FramePlan<'a, G, H> {
    Draw(DrawCall<'a, G, H>),
    Fallback(Diagnostic),
}

fn resolve_texture<'a, H>(
    assets: &'a AssetStore<H>,
    role: ResourceRole,
    name: &str,
    missing: &mut Vec<MissingResource>,
) -> Option<&'a H> {
    let reason = match assets.state(name) {
        Some(AssetState::Ready(handle)) => return Some(handle),
        Some(AssetState::Loading) => MissingReason::Loading,
        Some(AssetState::Failed(e)) => MissingReason::Unavailable(e.clone()),
        None => MissingReason::Unavailable(PreviewError::TextureNotListed {
            name: name.to_string(),
        }),
    };
    missing.push(MissingResource {
        role,
        name: name.to_string(),
        reason,
    });
    None
}

/// Decides what this frame shows.
///
/// An invalid viewport aspect is replaced by 1.0 so the frame still draws;
/// the error is carried in [`DrawCall::aspect_error`].
pub fn plan_frame<'a, G, H>(
    scene: &'a SceneState,
    interaction: &InteractionState,
    assets: &'a AssetStore<H>,
    meshes: &'a MeshRegistry<G>,
) -> FramePlan<'a, G, H> {
    let mut missing = Vec::new();
    let diffuse = resolve_texture(
        assets,
        ResourceRole::DiffuseTexture,
        &scene.diffuse_texture_id,
        &mut missing,
    );
    let normal = resolve_texture(
        assets,
        ResourceRole::NormalTexture,
        &scene.normal_texture_id,
        &mut missing,
    );
    let geometry = meshes.lookup(&scene.selected_mesh_id);
    if geometry.is_none() {
        missing.push(MissingResource {
            role: ResourceRole::Mesh,
            name: scene.selected_mesh_id.clone(),
            reason: MissingReason::Unavailable(PreviewError::MeshNotFound {
                name: scene.selected_mesh_id.clone(),
            }),
        });
    }

    let (Some(diffuse), Some(normal), Some(geometry)) = (diffuse, normal, geometry) else {
        return FramePlan::Fallback(Diagnostic { missing });
    };

    let (yaw, pitch, zoom) = (
        interaction.orbit_yaw,
        interaction.orbit_pitch,
        interaction.zoom_distance,
    );
    let (camera, aspect_error) = match scene
        .aspect_ratio()
        .and_then(|aspect| camera::compute_camera(yaw, pitch, zoom, aspect))
    {
        Ok(camera) => (camera, None),
        Err(e) => (camera::compute_square_camera(yaw, pitch, zoom), Some(e)),
    };

    FramePlan::Draw(DrawCall {
        mesh_id: &scene.selected_mesh_id,
        diffuse_id: &scene.diffuse_texture_id,
        normal_id: &scene.normal_texture_id,
        geometry,
        uniforms: Uniforms::new(&camera, scene.light_position, diffuse, normal),
        settings: DrawSettings::default(),
        aspect_error,
    })
}

/// The rendering side of a frame.
pub trait RenderBackend {
    type Geometry;
    type Texture;
    type Error;

    /// Draws the mesh once with the given uniforms.
    fn draw(&mut self, call: &DrawCall<'_, Self::Geometry, Self::Texture>) -> Result<(), Self::Error>;

    /// Shows the diagnostic instead of a 3D frame.
    fn fallback(&mut self, diagnostic: &Diagnostic) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Fallback,
}

/// Drives the clock and hands each frame's plan to a backend.
#[derive(Debug, Default)]
pub struct FrameLoop {
    frames_drawn: u64,
    fallbacks: u64,
    aspect_warnings: u64,
    last_diagnostic: Option<Diagnostic>,
    last_aspect_error: Option<PreviewError>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the session clock. Paused sessions keep their time.
    pub fn tick<G, H>(&self, session: &mut Session<G, H>, dt: Duration) {
        session.update(Message::Scene(SceneEvent::Tick(dt)));
    }

    pub fn render<B: RenderBackend>(
        &mut self,
        session: &Session<B::Geometry, B::Texture>,
        backend: &mut B,
    ) -> Result<FrameOutcome, B::Error> {
        match session.plan_frame() {
            FramePlan::Draw(call) => {
                if self.last_diagnostic.take().is_some() {
                    log::info!("All resources ready, drawing '{}'", call.mesh_id);
                }
                if call.aspect_error != self.last_aspect_error {
                    if let Some(e) = &call.aspect_error {
                        log::warn!("{e}, drawing with aspect ratio 1.0");
                        self.aspect_warnings += 1;
                    }
                    self.last_aspect_error = call.aspect_error.clone();
                }
                backend.draw(&call)?;
                self.frames_drawn += 1;
                Ok(FrameOutcome::Drawn)
            }
            FramePlan::Fallback(diagnostic) => {
                if self.last_diagnostic.as_ref() != Some(&diagnostic) {
                    if diagnostic.is_loading_only() {
                        log::info!("Not drawing: {diagnostic}");
                    } else {
                        log::warn!("Not drawing: {diagnostic}");
                    }
                }
                backend.fallback(&diagnostic)?;
                self.fallbacks += 1;
                self.last_diagnostic = Some(diagnostic);
                Ok(FrameOutcome::Fallback)
            }
        }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// How often an invalid aspect was reported. Repeats of the same error
    /// on consecutive drawn frames count once.
    pub fn aspect_warnings(&self) -> u64 {
        self.aspect_warnings
    }
}
