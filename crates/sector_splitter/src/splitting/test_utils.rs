//! Fixtures shared by the splitting tests.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{BoundingBox, Node, Sector};
use crate::cost::CostEstimator;
use crate::error::BoxError;
use crate::types::{Geometry, OwnerId, Primitive};

// =============================================================================
// Estimators
// =============================================================================

/// Charges the same byte size for every primitive.
pub struct FixedCostEstimator {
  pub bytes_per_primitive: u64,
}

impl FixedCostEstimator {
  pub fn new(bytes_per_primitive: u64) -> Self {
    Self { bytes_per_primitive }
  }
}

impl CostEstimator for FixedCostEstimator {
  fn estimate_byte_size(&self, _primitive: &Primitive) -> Result<u64, BoxError> {
    Ok(self.bytes_per_primitive)
  }

  fn estimate_triangle_count(&self, primitives: &[Primitive]) -> Result<u64, BoxError> {
    Ok(primitives.len() as u64 * 12)
  }
}

/// Always fails, for error propagation tests.
pub struct FailingEstimator;

impl CostEstimator for FailingEstimator {
  fn estimate_byte_size(&self, _primitive: &Primitive) -> Result<u64, BoxError> {
    Err("estimator offline".into())
  }

  fn estimate_triangle_count(&self, _primitives: &[Primitive]) -> Result<u64, BoxError> {
    Err("estimator offline".into())
  }
}

// =============================================================================
// Primitive / node fixtures
// =============================================================================

/// Box primitive occupying `[min, min + size]`.
pub fn box_primitive(owner_id: OwnerId, min: Vec3, size: f32) -> Primitive {
  let bounds = BoundingBox::new(min, min + Vec3::splat(size));
  Primitive::new(
    owner_id,
    bounds,
    Geometry::Box {
      instance_matrix: Mat4::from_scale_rotation_translation(
        Vec3::splat(size),
        glam::Quat::IDENTITY,
        bounds.center(),
      ),
    },
  )
}

/// Single-primitive node centered at `center`.
pub fn node_at(owner_id: OwnerId, center: Vec3, size: f32, byte_size: u64) -> Node {
  let primitive = box_primitive(owner_id, center - Vec3::splat(size * 0.5), size);
  Node::from_primitives(owner_id, vec![primitive], &FixedCostEstimator::new(byte_size))
    .expect("single primitive node")
}

/// `count` unit boxes scattered uniformly in `[0, extent]³`, one owner each.
pub fn scattered_primitives(count: usize, extent: f32, seed: u64) -> Vec<Primitive> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|i| {
      let min = Vec3::new(
        rng.random_range(0.0..extent - 1.0),
        rng.random_range(0.0..extent - 1.0),
        rng.random_range(0.0..extent - 1.0),
      );
      box_primitive(i as OwnerId, min, 1.0)
    })
    .collect()
}

// =============================================================================
// Sector tree checks
// =============================================================================

/// Sorted (owner id, min corner bits) keys of all geometries in `sectors`.
pub fn geometry_keys(sectors: &[Sector]) -> Vec<(OwnerId, [u32; 3])> {
  let mut keys: Vec<_> = sectors
    .iter()
    .flat_map(|s| s.geometries.iter())
    .map(primitive_key)
    .collect();
  keys.sort_unstable();
  keys
}

/// Sorted (owner id, min corner bits) keys of `primitives`.
pub fn primitive_keys(primitives: &[Primitive]) -> Vec<(OwnerId, [u32; 3])> {
  let mut keys: Vec<_> = primitives.iter().map(primitive_key).collect();
  keys.sort_unstable();
  keys
}

fn primitive_key(p: &Primitive) -> (OwnerId, [u32; 3]) {
  let min = p.bounding_box.min;
  (p.owner_id, [min.x.to_bits(), min.y.to_bits(), min.z.to_bits()])
}

/// Ids of sectors that have at least one child.
pub fn parent_ids(sectors: &[Sector]) -> HashMap<u32, usize> {
  let mut children = HashMap::new();
  for sector in sectors {
    if let Some(parent) = sector.parent_sector_id {
      *children.entry(parent).or_insert(0) += 1;
    }
  }
  children
}
