//! Orbit camera model.
//!
//! The camera sits on a sphere around the world origin and always looks at
//! it. Everything in here is a pure function of the orbit angles, the zoom
//! distance and the viewport aspect ratio, so the same inputs always produce
//! bit-identical matrices.

use std::f32::consts::PI;

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3};

use crate::error::PreviewError;

/// Vertical field of view of the preview camera.
pub const FOVY: cgmath::Deg<f32> = cgmath::Deg(45.0);
pub const Z_NEAR: f32 = 0.01;
pub const Z_FAR: f32 = 10000.0;

/// Lower bound of the polar angle. Keeps the camera off the pole where the
/// look-at basis degenerates.
pub const MIN_PITCH: f32 = 0.01;
pub const MAX_PITCH: f32 = PI;
pub const MIN_ZOOM: f32 = 0.01;

/// cgmath builds OpenGL style projections (depth in -1..1), wgpu expects
/// depth in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(
        aspect: f32,
        fovy: F,
        znear: f32,
        zfar: f32,
    ) -> Result<Self, PreviewError> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(PreviewError::InvalidAspect { aspect });
        }
        Ok(Self {
            aspect,
            fovy: fovy.into(),
            znear,
            zfar,
        })
    }

    /// The preview projection: 45° field of view, near 0.01, far 10000.
    pub fn preview(aspect: f32) -> Result<Self, PreviewError> {
        Self::new(aspect, FOVY, Z_NEAR, Z_FAR)
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Matrices and eye position derived from the orbit parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub view_projection: Matrix4<f32>,
    pub position: Point3<f32>,
}

/// Eye position on the orbit sphere.
///
/// `yaw` rotates around the vertical axis, `pitch` is the polar angle
/// measured from the vertical axis and is clamped to `[MIN_PITCH, MAX_PITCH]`.
pub fn orbit_position(yaw: f32, pitch: f32, zoom: f32) -> Point3<f32> {
    let pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
    Point3::new(
        zoom * (-yaw).sin() * pitch.sin(),
        -zoom * pitch.cos(),
        zoom * (-yaw).cos() * pitch.sin(),
    )
}

/// Computes projection, view and the combined matrix for an orbit camera
/// looking at the origin.
///
/// Fails only with [`PreviewError::InvalidAspect`].
pub fn compute_camera(
    yaw: f32,
    pitch: f32,
    zoom: f32,
    aspect: f32,
) -> Result<CameraMatrices, PreviewError> {
    let projection = Projection::preview(aspect)?;
    Ok(orbit_camera(yaw, pitch, zoom, &projection))
}

/// Same as [`compute_camera`] with an aspect ratio of 1.0, used when the
/// viewport reports an unusable size.
pub fn compute_square_camera(yaw: f32, pitch: f32, zoom: f32) -> CameraMatrices {
    let projection = Projection {
        aspect: 1.0,
        fovy: FOVY.into(),
        znear: Z_NEAR,
        zfar: Z_FAR,
    };
    orbit_camera(yaw, pitch, zoom, &projection)
}

fn orbit_camera(yaw: f32, pitch: f32, zoom: f32, projection: &Projection) -> CameraMatrices {
    let projection = projection.calc_matrix();
    let position = orbit_position(yaw, pitch, zoom);
    let view = Matrix4::look_at_rh(position, Point3::origin(), Vector3::unit_y());
    CameraMatrices {
        projection,
        view,
        view_projection: projection * view,
        position,
    }
}

/// Model transform of the previewed mesh.
///
/// Always the identity: meshes are shown untransformed. The normal matrix is
/// therefore the identity as well, which only holds while no scaling or
/// rotation is ever applied here.
pub fn model_matrix() -> Matrix4<f32> {
    Matrix4::identity()
}
