//! Primitive tessellation used by the rebalancer.
//!
//! Only shapes with a cheap, exact triangle representation are handled.
//! Everything else returns `None` and stays a primitive.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::error::BoxError;
use crate::types::{Geometry, Mesh, Primitive};

/// Segments around the axis of cones and cylinders.
pub const RADIAL_SEGMENTS: u32 = 12;

/// Turns a primitive into an equivalent triangle mesh primitive.
pub trait Tessellator: Sync {
  /// `Ok(None)` when the primitive cannot be tessellated. The result keeps
  /// the owner id and bounding box of the input.
  fn try_tessellate(&self, primitive: &Primitive) -> Result<Option<Primitive>, BoxError>;
}

/// Built-in tessellator for boxes, cones and cylinders.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimitiveTessellator;

impl Tessellator for PrimitiveTessellator {
  fn try_tessellate(&self, primitive: &Primitive) -> Result<Option<Primitive>, BoxError> {
    let mesh = match &primitive.geometry {
      Geometry::Box { instance_matrix } => tessellate_box(instance_matrix),
      Geometry::Cone {
        center_a,
        center_b,
        radius_a,
        radius_b,
      }
      | Geometry::EccentricCone {
        center_a,
        center_b,
        radius_a,
        radius_b,
        ..
      } => tessellate_cone(*center_a, *center_b, *radius_a, *radius_b),
      Geometry::Cylinder {
        center_a,
        center_b,
        radius,
      } => tessellate_cone(*center_a, *center_b, *radius, *radius),
      _ => None,
    };

    Ok(mesh.map(|mesh| with_mesh(primitive, mesh)))
  }
}

/// Copy of `primitive` with its geometry replaced by `mesh`.
pub(crate) fn with_mesh(primitive: &Primitive, mesh: Mesh) -> Primitive {
  Primitive {
    geometry: Geometry::TriangleMesh { mesh: Arc::new(mesh) },
    ..primitive.clone()
  }
}

// =============================================================================
// Shapes
// =============================================================================

#[rustfmt::skip]
const UNIT_CUBE_VERTICES: [Vec3; 8] = [
  Vec3::new(-0.5, -0.5, -0.5),
  Vec3::new( 0.5, -0.5, -0.5),
  Vec3::new( 0.5,  0.5, -0.5),
  Vec3::new(-0.5,  0.5, -0.5),
  Vec3::new(-0.5, -0.5,  0.5),
  Vec3::new( 0.5, -0.5,  0.5),
  Vec3::new( 0.5,  0.5,  0.5),
  Vec3::new(-0.5,  0.5,  0.5),
];

#[rustfmt::skip]
const UNIT_CUBE_INDICES: [u32; 36] = [
  0, 2, 1,  0, 3, 2,
  0, 1, 5,  0, 5, 4,
  1, 2, 6,  1, 6, 5,
  2, 3, 7,  2, 7, 6,
  3, 0, 4,  3, 4, 7,
  4, 5, 6,  4, 6, 7,
];

/// Unit cube centered at the origin, transformed by `matrix`.
fn tessellate_box(matrix: &Mat4) -> Option<Mesh> {
  let vertices: Vec<Vec3> = UNIT_CUBE_VERTICES
    .iter()
    .map(|v| matrix.transform_point3(*v))
    .collect();
  if !vertices.iter().all(|v| v.is_finite()) {
    return None;
  }
  Some(Mesh::new(vertices, UNIT_CUBE_INDICES.to_vec()))
}

/// Closed side wall between two rings; caps are not generated.
///
/// ```text
///   b0──b1──b2 ... b11──b0
///   │ ╲ │ ╲ │        │ ╲ │
///   a0──a1──a2 ... a11──a0
/// ```
fn tessellate_cone(center_a: Vec3, center_b: Vec3, radius_a: f32, radius_b: f32) -> Option<Mesh> {
  let axis = (center_b - center_a).try_normalize()?;
  if !(radius_a.is_finite() && radius_b.is_finite()) {
    return None;
  }

  let start = axis.any_orthonormal_vector();
  let step = TAU / RADIAL_SEGMENTS as f32;

  let mut vertices = Vec::with_capacity(2 * RADIAL_SEGMENTS as usize);
  for i in 0..RADIAL_SEGMENTS {
    let direction = Quat::from_axis_angle(axis, -step * i as f32) * start;
    vertices.push(center_a + direction * radius_a);
    vertices.push(center_b + direction * radius_b);
  }

  let ring = 2 * RADIAL_SEGMENTS;
  let mut indices = Vec::with_capacity(6 * RADIAL_SEGMENTS as usize);
  for i in 0..RADIAL_SEGMENTS {
    let a0 = 2 * i;
    let b0 = a0 + 1;
    let a1 = (a0 + 2) % ring;
    let b1 = (a0 + 3) % ring;
    indices.extend_from_slice(&[a0, b0, a1, b0, a1, b1]);
  }

  Some(Mesh::new(vertices, indices))
}
