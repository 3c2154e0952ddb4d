//! Axis-aligned bounding box used by nodes and sectors.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// `min <= max` is not enforced: providers occasionally hand over boxes with
/// swapped corners and the splitters must still place those primitives.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
  /// Minimum corner.
  pub min: Vec3,
  /// Maximum corner.
  pub max: Vec3,
}

impl BoundingBox {
  /// Degenerate box at the origin, used for empty sectors.
  pub const ZERO: Self = Self {
    min: Vec3::ZERO,
    max: Vec3::ZERO,
  };

  /// Create a box from min and max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Create a box from center and half-extents.
  pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
    Self {
      min: center - half_extents,
      max: center + half_extents,
    }
  }

  /// Smallest box enclosing all points, `None` for an empty iterator.
  pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
    let mut points = points.into_iter();
    let first = points.next()?;
    Some(points.fold(Self::new(first, first), |bounds, p| bounds.encapsulate_point(p)))
  }

  /// Get the center of the box.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Get the size of the box (max - min).
  #[inline]
  pub fn extents(&self) -> Vec3 {
    self.max - self.min
  }

  /// Euclidean distance between the two corners.
  #[inline]
  pub fn diagonal(&self) -> f32 {
    self.min.distance(self.max)
  }

  /// Component-wise union of two boxes.
  #[inline]
  pub fn encapsulate(&self, other: &BoundingBox) -> Self {
    Self {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Expand the box to include a point.
  #[inline]
  pub fn encapsulate_point(&self, point: Vec3) -> Self {
    Self {
      min: self.min.min(point),
      max: self.max.max(point),
    }
  }

  /// Check if this box overlaps another (touching counts).
  #[inline]
  pub fn overlaps(&self, other: &BoundingBox) -> bool {
    self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
  }

  /// Check if this box contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    self.min.cmple(point).all() && self.max.cmpge(point).all()
  }

  /// Axis-aligned bounds of this box after applying `matrix`.
  pub fn transformed(&self, matrix: &Mat4) -> Self {
    let corners = (0..8u8).map(|i| {
      Vec3::new(
        if i & 1 == 0 { self.min.x } else { self.max.x },
        if i & 2 == 0 { self.min.y } else { self.max.y },
        if i & 4 == 0 { self.min.z } else { self.max.z },
      )
    });
    let mut transformed = corners.map(|c| matrix.transform_point3(c));
    // Eight corners are always present.
    let first = transformed.next().unwrap_or(Vec3::ZERO);
    transformed.fold(Self::new(first, first), |bounds, p| bounds.encapsulate_point(p))
  }

  /// Union of all boxes, `None` for an empty iterator.
  pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<Self> {
    let mut boxes = boxes.into_iter();
    let first = *boxes.next()?;
    Some(boxes.fold(first, |acc, b| acc.encapsulate(b)))
  }
}
