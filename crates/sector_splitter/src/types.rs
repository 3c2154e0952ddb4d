//! Core data types for scene primitives.
//!
//! Primitives are produced by the CAD providers upstream and are immutable
//! from the splitter's point of view. Mesh payloads sit behind `Arc` so
//! moving a primitive between nodes and sectors never copies vertex data.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::splitting::BoundingBox;

/// Identifier grouping every primitive that came from one model element
/// (the "tree index").
pub type OwnerId = u64;

/// Identifier of a shared instancing template.
pub type TemplateId = u64;

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
  /// Vertex positions.
  pub vertices: Vec<Vec3>,
  /// Triangle list, three indices per triangle.
  pub indices: Vec<u32>,
}

impl Mesh {
  /// Create a mesh from vertices and a triangle index list.
  pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
    debug_assert!(indices.len() % 3 == 0, "index count must be a multiple of 3");
    Self { vertices, indices }
  }

  /// Number of triangles in the index list.
  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Copy of this mesh with `matrix` baked into every vertex.
  pub fn transformed(&self, matrix: &Mat4) -> Self {
    Self {
      vertices: self
        .vertices
        .iter()
        .map(|v| matrix.transform_point3(*v))
        .collect(),
      indices: self.indices.clone(),
    }
  }

  /// Bounds of the vertex positions, `None` for a mesh without vertices.
  pub fn bounding_box(&self) -> Option<BoundingBox> {
    BoundingBox::from_points(self.vertices.iter().copied())
  }
}

/// Discriminant of [`Geometry`], used to group primitives by type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
  Box,
  Circle,
  Cone,
  EccentricCone,
  Cylinder,
  Ellipsoid,
  Sphere,
  Torus,
  InstancedMesh,
  TriangleMesh,
}

impl GeometryKind {
  /// True for kinds that already carry triangle data.
  #[inline]
  pub fn is_mesh(self) -> bool {
    matches!(self, GeometryKind::InstancedMesh | GeometryKind::TriangleMesh)
  }
}

/// Geometry payload of a primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
  /// Unit cube transformed by `instance_matrix`.
  Box { instance_matrix: Mat4 },
  /// Unit disc transformed by `instance_matrix`.
  Circle { instance_matrix: Mat4 },
  /// Cone between two cap centers.
  Cone {
    center_a: Vec3,
    center_b: Vec3,
    radius_a: f32,
    radius_b: f32,
  },
  /// Cone whose caps share a `normal` that is not parallel to the axis.
  EccentricCone {
    center_a: Vec3,
    center_b: Vec3,
    normal: Vec3,
    radius_a: f32,
    radius_b: f32,
  },
  /// Cylinder between two cap centers.
  Cylinder {
    center_a: Vec3,
    center_b: Vec3,
    radius: f32,
  },
  /// Unit sphere scaled into an ellipsoid by `instance_matrix`.
  Ellipsoid { instance_matrix: Mat4 },
  Sphere { center: Vec3, radius: f32 },
  Torus {
    instance_matrix: Mat4,
    radius: f32,
    tube_radius: f32,
  },
  /// One placement of a shared template mesh.
  InstancedMesh {
    template_id: TemplateId,
    template: Arc<Mesh>,
    instance_matrix: Mat4,
  },
  /// Standalone triangle mesh in world space.
  TriangleMesh { mesh: Arc<Mesh> },
}

impl Geometry {
  /// Kind discriminant of this geometry.
  pub fn kind(&self) -> GeometryKind {
    match self {
      Geometry::Box { .. } => GeometryKind::Box,
      Geometry::Circle { .. } => GeometryKind::Circle,
      Geometry::Cone { .. } => GeometryKind::Cone,
      Geometry::EccentricCone { .. } => GeometryKind::EccentricCone,
      Geometry::Cylinder { .. } => GeometryKind::Cylinder,
      Geometry::Ellipsoid { .. } => GeometryKind::Ellipsoid,
      Geometry::Sphere { .. } => GeometryKind::Sphere,
      Geometry::Torus { .. } => GeometryKind::Torus,
      Geometry::InstancedMesh { .. } => GeometryKind::InstancedMesh,
      Geometry::TriangleMesh { .. } => GeometryKind::TriangleMesh,
    }
  }
}

/// A single scene primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
  /// Owning model element.
  pub owner_id: OwnerId,
  /// Discipline tag (e.g. "PIPE"), set by the tag classifier upstream.
  #[serde(default)]
  pub discipline: Option<String>,
  /// Greater than zero for primitives selected for highlight loading.
  #[serde(default)]
  pub priority: u8,
  /// World-space axis-aligned bounds.
  pub bounding_box: BoundingBox,
  pub geometry: Geometry,
}

impl Primitive {
  /// Create an unprioritized primitive without a discipline.
  pub fn new(owner_id: OwnerId, bounding_box: BoundingBox, geometry: Geometry) -> Self {
    Self {
      owner_id,
      discipline: None,
      priority: 0,
      bounding_box,
      geometry,
    }
  }

  /// Set the discipline tag.
  pub fn with_discipline(mut self, discipline: impl Into<String>) -> Self {
    self.discipline = Some(discipline.into());
    self
  }

  /// Set the priority flag.
  pub fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }

  /// True when the primitive belongs in the highlight tree.
  #[inline]
  pub fn is_prioritized(&self) -> bool {
    self.priority > 0
  }

  /// Center of the bounding box.
  #[inline]
  pub fn center(&self) -> Vec3 {
    self.bounding_box.center()
  }

  /// Kind of the geometry payload.
  #[inline]
  pub fn kind(&self) -> GeometryKind {
    self.geometry.kind()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
