//! Mesh sources for the registry: built-in primitives and Wavefront OBJ files.
//!
//! All geometry leaves this module wound clockwise as seen from outside, see
//! [`MeshData`]. Tangents and bitangents are always computed here because
//! neither the primitives nor OBJ files carry them, and normal mapping needs
//! them.

use std::{
    f32::consts::PI,
    io::{BufReader, Cursor},
    path::Path,
};

use cgmath::{InnerSpace, Vector2, Vector3, Zero};

use crate::{
    data_structures::{
        model::{MeshData, ModelVertex},
        registry::MeshRegistry,
    },
    resources::load_string,
};

pub const SPHERE_RINGS: u32 = 32;
pub const SPHERE_SEGMENTS: u32 = 64;

/// The meshes every session offers, in selector order.
pub fn builtin_meshes() -> MeshRegistry<MeshData> {
    let mut registry = MeshRegistry::new();
    registry.insert("cube", cube());
    registry.insert("sphere", sphere(SPHERE_RINGS, SPHERE_SEGMENTS));
    registry.insert("plane", plane());
    registry
}

/// Unit cube (half extent 1) with one quad per face.
pub fn cube() -> MeshData {
    // (normal, u axis, v axis) with u x v = normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        push_quad(&mut mesh, normal.into(), normal.into(), u.into(), v.into());
    }
    finish(mesh)
}

/// Square of side 2 in the XZ plane, facing +Y.
pub fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    push_quad(
        &mut mesh,
        Vector3::zero(),
        Vector3::unit_y(),
        Vector3::unit_x(),
        -Vector3::unit_z(),
    );
    finish(mesh)
}

/// UV sphere of radius 1.
pub fn sphere(rings: u32, segments: u32) -> MeshData {
    let rings = rings.max(2);
    let segments = segments.max(3);
    let mut mesh = MeshData::default();

    for i in 0..=rings {
        let theta = PI * i as f32 / rings as f32;
        for j in 0..=segments {
            let phi = 2.0 * PI * j as f32 / segments as f32;
            let p = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            mesh.vertices.push(ModelVertex {
                position: p,
                tex_coords: [j as f32 / segments as f32, i as f32 / rings as f32],
                normal: p,
                ..Default::default()
            });
        }
    }

    let stride = segments + 1;
    for i in 0..rings {
        for j in 0..segments {
            let a = i * stride + j;
            let b = (i + 1) * stride + j;
            let c = b + 1;
            let d = a + 1;
            mesh.indices.extend_from_slice(&[a, c, b, a, d, c]);
        }
    }
    finish(mesh)
}

/// Loads every object of an OBJ file into one mesh. Materials are ignored;
/// the preview always uses the selected textures.
pub async fn load_obj(path: &Path) -> anyhow::Result<MeshData> {
    let obj_text = load_string(path).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| async { Err(tobj::LoadError::OpenFileFailed) },
    )
    .await?;

    let mut mesh = MeshData::default();
    let mut has_normals = true;
    for m in &models {
        let base = mesh.vertices.len() as u32;
        has_normals &= !m.mesh.normals.is_empty();
        mesh.vertices
            .extend((0..m.mesh.positions.len() / 3).map(|i| ModelVertex {
                position: [
                    m.mesh.positions[i * 3],
                    m.mesh.positions[i * 3 + 1],
                    m.mesh.positions[i * 3 + 2],
                ],
                tex_coords: [
                    m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                normal: [
                    m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
                ..Default::default()
            }));
        mesh.indices.extend(m.mesh.indices.iter().map(|i| base + i));
    }
    anyhow::ensure!(
        !mesh.indices.is_empty(),
        "{} contains no triangles",
        path.display()
    );
    if !has_normals {
        log::warn!("{} has no normals, computing smooth ones", path.display());
        compute_normals(&mut mesh.vertices, &mesh.indices);
    }
    log::info!(
        "Loaded {} ({} triangles)",
        path.display(),
        mesh.triangle_count()
    );
    Ok(finish(mesh))
}

fn push_quad(
    mesh: &mut MeshData,
    center: Vector3<f32>,
    normal: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
) {
    let base = mesh.vertices.len() as u32;
    let corners = [
        (center - u - v, [0.0, 1.0]),
        (center + u - v, [1.0, 1.0]),
        (center + u + v, [1.0, 0.0]),
        (center - u + v, [0.0, 0.0]),
    ];
    for (position, tex_coords) in corners {
        mesh.vertices.push(ModelVertex {
            position: position.into(),
            tex_coords,
            normal: normal.into(),
            ..Default::default()
        });
    }
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Generators build counter-clockwise geometry; this flips it to the
/// clockwise convention and adds tangents.
fn finish(mut mesh: MeshData) -> MeshData {
    for tri in mesh.indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
    compute_tangents(&mut mesh.vertices, &mesh.indices);
    mesh
}

/// Area weighted smooth vertex normals. Works for either winding as long as
/// it is consistent and counter-clockwise is outward.
fn compute_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut sums = vec![Vector3::<f32>::zero(); vertices.len()];
    for c in indices.chunks_exact(3) {
        let p0: Vector3<f32> = vertices[c[0] as usize].position.into();
        let p1: Vector3<f32> = vertices[c[1] as usize].position.into();
        let p2: Vector3<f32> = vertices[c[2] as usize].position.into();
        let n = (p1 - p0).cross(p2 - p0);
        for &i in c {
            sums[i as usize] += n;
        }
    }
    for (v, n) in vertices.iter_mut().zip(sums) {
        if n.magnitude2() > 0.0 {
            v.normal = n.normalize().into();
        }
    }
}

/// Per-vertex tangents and bitangents, averaged over the adjacent triangles.
///
/// Triangles with degenerate texture coordinates contribute nothing.
pub fn compute_tangents(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut tangents = vec![Vector3::<f32>::zero(); vertices.len()];
    let mut bitangents = vec![Vector3::<f32>::zero(); vertices.len()];
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in indices.chunks_exact(3) {
        let v0 = vertices[c[0] as usize];
        let v1 = vertices[c[1] as usize];
        let v2 = vertices[c[2] as usize];

        let pos0: Vector3<f32> = v0.position.into();
        let pos1: Vector3<f32> = v1.position.into();
        let pos2: Vector3<f32> = v2.position.into();

        let uv0: Vector2<f32> = v0.tex_coords.into();
        let uv1: Vector2<f32> = v1.tex_coords.into();
        let uv2: Vector2<f32> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solves
        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // Flipped for right-handed normal maps with wgpu texture coordinates
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for &i in c {
            tangents[i as usize] += tangent;
            bitangents[i as usize] += bitangent;
            triangles_included[i as usize] += 1;
        }
    }

    for (i, n) in triangles_included.into_iter().enumerate() {
        if n == 0 {
            continue;
        }
        let denom = 1.0 / n as f32;
        vertices[i].tangent = (tangents[i] * denom).into();
        vertices[i].bitangent = (bitangents[i] * denom).into();
    }
}
