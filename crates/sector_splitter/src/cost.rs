//! Payload cost estimation.
//!
//! The splitters only need relative costs: a byte estimate per primitive to
//! fill budgets, and a triangle estimate for diagnostics. Callers can plug
//! their own [`CostEstimator`]; [`DrawCallEstimator`] is the built-in one.

use std::collections::HashSet;

use crate::error::BoxError;
use crate::types::{Geometry, GeometryKind, Primitive};

/// Estimates the payload cost of primitives.
///
/// Errors are passed through the splitters unchanged.
pub trait CostEstimator: Sync {
  /// Estimated serialized size of one primitive, in bytes.
  fn estimate_byte_size(&self, primitive: &Primitive) -> Result<u64, BoxError>;

  /// Estimated number of triangles needed to render `primitives`.
  fn estimate_triangle_count(&self, primitives: &[Primitive]) -> Result<u64, BoxError>;
}

/// Owner id, color and diagonal attributes shared by every primitive.
const COMMON_ATTRIBUTE_BYTES: u64 = 12;
const MATRIX_BYTES: u64 = 64;
const VEC3_BYTES: u64 = 12;
const FLOAT_BYTES: u64 = 4;
const INDEX_BYTES: u64 = 4;

/// Attribute-layout based estimator.
#[derive(Clone, Copy, Debug, Default)]
pub struct DrawCallEstimator;

impl DrawCallEstimator {
  /// Bytes needed to store one primitive's attributes.
  pub fn byte_size(primitive: &Primitive) -> u64 {
    let attributes = match &primitive.geometry {
      Geometry::Box { .. } | Geometry::Ellipsoid { .. } | Geometry::InstancedMesh { .. } => {
        MATRIX_BYTES
      }
      Geometry::Circle { .. } => MATRIX_BYTES + VEC3_BYTES,
      Geometry::Cone { .. } => 2 * VEC3_BYTES + 2 * FLOAT_BYTES,
      Geometry::EccentricCone { .. } => 3 * VEC3_BYTES + 2 * FLOAT_BYTES,
      Geometry::Cylinder { .. } => 2 * VEC3_BYTES + FLOAT_BYTES,
      Geometry::Sphere { .. } => VEC3_BYTES + FLOAT_BYTES,
      Geometry::Torus { .. } => MATRIX_BYTES + 2 * FLOAT_BYTES,
      Geometry::TriangleMesh { mesh } => {
        mesh.vertices.len() as u64 * VEC3_BYTES + mesh.indices.len() as u64 * INDEX_BYTES
      }
    };
    COMMON_ATTRIBUTE_BYTES + attributes
  }

  /// Triangles a single primitive contributes once tessellated on the GPU.
  pub fn triangle_count(primitive: &Primitive) -> u64 {
    match &primitive.geometry {
      Geometry::Box { .. } => 12,
      Geometry::Circle { .. } => 2,
      Geometry::Cone { .. }
      | Geometry::EccentricCone { .. }
      | Geometry::Cylinder { .. }
      | Geometry::Ellipsoid { .. }
      | Geometry::Sphere { .. }
      | Geometry::Torus { .. } => 4,
      Geometry::InstancedMesh { template, .. } => template.triangle_count() as u64,
      Geometry::TriangleMesh { mesh } => mesh.triangle_count() as u64,
    }
  }

  /// Estimated draw calls: one batch per primitive kind plus one per
  /// distinct instancing template.
  pub fn draw_calls(primitives: &[Primitive]) -> usize {
    let kinds: HashSet<GeometryKind> = primitives.iter().map(Primitive::kind).collect();
    let templates: HashSet<u64> = primitives
      .iter()
      .filter_map(|p| match &p.geometry {
        Geometry::InstancedMesh { template_id, .. } => Some(*template_id),
        _ => None,
      })
      .collect();
    kinds.len() + templates.len()
  }
}

impl CostEstimator for DrawCallEstimator {
  fn estimate_byte_size(&self, primitive: &Primitive) -> Result<u64, BoxError> {
    Ok(Self::byte_size(primitive))
  }

  fn estimate_triangle_count(&self, primitives: &[Primitive]) -> Result<u64, BoxError> {
    Ok(primitives.iter().map(Self::triangle_count).sum())
  }
}
