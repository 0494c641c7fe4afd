use std::convert::Infallible;

use cgmath::{Matrix4, Point3, Vector3};
use shader_preview::{
    data_structures::registry::MeshRegistry,
    frame::{Diagnostic, DrawCall, DrawSettings, RenderBackend},
    session::{Message, Session, TextureSetup},
};
use winit::dpi::PhysicalPosition;

/// Geometry stand-in: the mesh name.
pub(crate) type TestGeometry = String;
/// Texture stand-in: a handle number.
pub(crate) type TestTexture = u32;

/// What one draw call carried, copied out of the borrowed [`DrawCall`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedDraw {
    pub mesh_id: String,
    pub geometry: TestGeometry,
    pub diffuse: TestTexture,
    pub normal: TestTexture,
    pub settings: DrawSettings,
    pub projection: Matrix4<f32>,
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model_view_projection: Matrix4<f32>,
    pub light_position_view_space: Vector3<f32>,
    pub camera_position: Point3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recorded {
    Draw(RecordedDraw),
    Fallback(Diagnostic),
}

/// Backend that records every call instead of touching a GPU.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Recorded>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<&RecordedDraw> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Recorded::Draw(d) => Some(d),
                Recorded::Fallback(_) => None,
            })
            .collect()
    }

    pub fn fallbacks(&self) -> Vec<&Diagnostic> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Recorded::Fallback(d) => Some(d),
                Recorded::Draw(_) => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    type Geometry = TestGeometry;
    type Texture = TestTexture;
    type Error = Infallible;

    fn draw(&mut self, call: &DrawCall<'_, TestGeometry, TestTexture>) -> Result<(), Infallible> {
        let u = &call.uniforms;
        self.calls.push(Recorded::Draw(RecordedDraw {
            mesh_id: call.mesh_id.to_string(),
            geometry: call.geometry.clone(),
            diffuse: *u.diffuse_texture,
            normal: *u.normal_texture,
            settings: call.settings,
            projection: u.projection,
            model: u.model,
            view: u.view,
            model_view_projection: u.model_view_projection,
            light_position_view_space: u.light_position_view_space,
            camera_position: u.camera_position_world_space,
        }));
        Ok(())
    }

    fn fallback(&mut self, diagnostic: &Diagnostic) -> Result<(), Infallible> {
        self.calls.push(Recorded::Fallback(diagnostic.clone()));
        Ok(())
    }
}

pub(crate) fn textures(default: &str, extras: &[&str]) -> TextureSetup {
    TextureSetup {
        default_texture: default.to_string(),
        extra_textures: extras.iter().map(|s| s.to_string()).collect(),
    }
}

/// Registry whose geometry is the mesh name itself.
pub(crate) fn meshes(names: &[&str]) -> MeshRegistry<TestGeometry> {
    let mut registry = MeshRegistry::new();
    for name in names {
        registry.insert(*name, name.to_string());
    }
    registry
}

pub(crate) const LIGHT: [f32; 3] = [2.0, 3.0, 4.0];

/// A session over `cube`/`sphere` and the given textures. Returns the
/// session and the texture names it requested, in order.
pub(crate) fn session(
    default: &str,
    extras: &[&str],
) -> (Session<TestGeometry, TestTexture>, Vec<String>) {
    let mut requested = Vec::new();
    let session = Session::new(
        &textures(default, extras),
        meshes(&["cube", "sphere"]),
        LIGHT.into(),
        |name| requested.push(name.to_string()),
    );
    (session, requested)
}

/// Resolves every requested texture successfully, numbering handles from 1.
pub(crate) fn load_all(session: &mut Session<TestGeometry, TestTexture>, names: &[String]) {
    for (i, name) in names.iter().enumerate() {
        session.update(Message::TextureLoaded {
            name: name.clone(),
            result: Ok(i as u32 + 1),
        });
    }
}

pub(crate) fn pos(x: f64, y: f64) -> PhysicalPosition<f64> {
    PhysicalPosition::new(x, y)
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn assert_matrix_close(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let a: [[f32; 4]; 4] = actual.into();
    let e: [[f32; 4]; 4] = expected.into();
    for (ca, ce) in a.iter().zip(e.iter()) {
        for (va, ve) in ca.iter().zip(ce.iter()) {
            assert_close(*va, *ve);
        }
    }
}
