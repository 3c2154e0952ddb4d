//! Voxel keys - octant classification of nodes.
//!
//! A node's octant relative to a box is decided by majority vote over its
//! primitives, so a long pipe that mostly lies in one octant follows the
//! bulk of its geometry.
//!
//! ```text
//! code = 1 + 4·[x < cx] + 2·[y < cy] + [z < cz]
//!
//!   A (+,+,+)   B (+,+,-)   C (+,-,+)   D (+,-,-)
//!   E (-,+,+)   F (-,+,-)   G (-,-,+)   H (-,-,-)
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{BoundingBox, Node};

/// Octant label of a node relative to a bounding box.
///
/// `Main` is reserved for nodes kept at the current level; the classifier
/// never returns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoxelKey {
  Main = 0,
  A = 1,
  B = 2,
  C = 3,
  D = 4,
  E = 5,
  F = 6,
  G = 7,
  H = 8,
}

impl VoxelKey {
  /// The eight sub-voxel keys in numeric order.
  pub const SUB_VOXELS: [VoxelKey; 8] = [
    VoxelKey::A,
    VoxelKey::B,
    VoxelKey::C,
    VoxelKey::D,
    VoxelKey::E,
    VoxelKey::F,
    VoxelKey::G,
    VoxelKey::H,
  ];

  /// Numeric code (0 for `Main`, 1..=8 for sub-voxels).
  #[inline]
  pub fn code(self) -> u8 {
    self as u8
  }

  /// Index into an 8-slot sub-voxel array, `None` for `Main`.
  #[inline]
  pub fn sub_voxel_index(self) -> Option<usize> {
    match self {
      VoxelKey::Main => None,
      key => Some(key.code() as usize - 1),
    }
  }

  /// Octant of `point` relative to `center`.
  ///
  /// A coordinate equal to the center counts as positive.
  #[inline]
  pub fn for_point(point: Vec3, center: Vec3) -> VoxelKey {
    let below = point.cmplt(center);
    let index = ((below.x as usize) << 2) | ((below.y as usize) << 1) | (below.z as usize);
    Self::SUB_VOXELS[index]
  }
}

/// Octant of a node relative to `bounds`, by majority vote of its
/// primitives' bounding box centers.
///
/// Ties go to the lowest key, so repeated calls on identical input always
/// agree. A node without primitives falls back to its own center.
pub fn classify_node(node: &Node, bounds: &BoundingBox) -> VoxelKey {
  let center = bounds.center();
  if node.geometries.is_empty() {
    return VoxelKey::for_point(node.center(), center);
  }

  let mut tally = [0u32; 8];
  for geometry in &node.geometries {
    let key = VoxelKey::for_point(geometry.center(), center);
    if let Some(index) = key.sub_voxel_index() {
      tally[index] += 1;
    }
  }

  let mut best = 0;
  for index in 1..tally.len() {
    if tally[index] > tally[best] {
      best = index;
    }
  }
  VoxelKey::SUB_VOXELS[best]
}

#[cfg(test)]
#[path = "voxel_test.rs"]
mod voxel_test;
