//! Node - the atomic unit of splitting.
//!
//! A node is every primitive sharing one owner id. The splitters never
//! separate a node's primitives, so one model element always loads from a
//! single sector.

use std::collections::HashMap;

use rayon::prelude::*;

use super::BoundingBox;
use crate::cost::CostEstimator;
use crate::error::SplitError;
use crate::types::{OwnerId, Primitive};

/// All primitives of one owner, with precomputed cost and bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
  pub owner_id: OwnerId,
  pub geometries: Vec<Primitive>,
  pub estimated_byte_size: u64,
  pub estimated_triangle_count: u64,
  pub bounding_box: BoundingBox,
  /// Diagonal of `bounding_box`, cached for sorting.
  pub diagonal: f32,
}

impl Node {
  /// Build a node from a non-empty primitive group.
  ///
  /// Returns [`SplitError::EmptyNodeSet`] for an empty group.
  pub fn from_primitives<E>(
    owner_id: OwnerId,
    geometries: Vec<Primitive>,
    estimator: &E,
  ) -> Result<Self, SplitError>
  where
    E: CostEstimator + ?Sized,
  {
    let bounding_box =
      calculate_geometry_bounding_box(&geometries).ok_or(SplitError::EmptyNodeSet)?;

    let mut estimated_byte_size = 0;
    for geometry in &geometries {
      estimated_byte_size += estimator.estimate_byte_size(geometry)?;
    }
    let estimated_triangle_count = estimator.estimate_triangle_count(&geometries)?;

    Ok(Self {
      owner_id,
      geometries,
      estimated_byte_size,
      estimated_triangle_count,
      diagonal: bounding_box.diagonal(),
      bounding_box,
    })
  }

  /// Center of the node's bounding box.
  #[inline]
  pub fn center(&self) -> glam::Vec3 {
    self.bounding_box.center()
  }
}

/// Group primitives by owner id, keeping first-appearance order.
pub fn group_by_owner(primitives: impl IntoIterator<Item = Primitive>) -> Vec<(OwnerId, Vec<Primitive>)> {
  let mut index_by_owner: HashMap<OwnerId, usize> = HashMap::new();
  let mut groups: Vec<(OwnerId, Vec<Primitive>)> = Vec::new();

  for primitive in primitives {
    let index = *index_by_owner.entry(primitive.owner_id).or_insert_with(|| {
      groups.push((primitive.owner_id, Vec::new()));
      groups.len() - 1
    });
    groups[index].1.push(primitive);
  }

  groups
}

/// Group primitives into nodes, one per owner id.
///
/// Cost estimation runs in parallel; the result keeps first-appearance
/// order of the owner ids, so output is deterministic.
pub fn group_into_nodes<E>(primitives: Vec<Primitive>, estimator: &E) -> Result<Vec<Node>, SplitError>
where
  E: CostEstimator + ?Sized,
{
  group_by_owner(primitives)
    .into_par_iter()
    .map(|(owner_id, geometries)| Node::from_primitives(owner_id, geometries, estimator))
    .collect()
}

/// Bounding box enclosing all nodes.
///
/// Returns [`SplitError::EmptyNodeSet`] when `nodes` is empty.
pub fn calculate_bounding_box(nodes: &[Node]) -> Result<BoundingBox, SplitError> {
  BoundingBox::union_all(nodes.iter().map(|n| &n.bounding_box)).ok_or(SplitError::EmptyNodeSet)
}

/// Bounding box enclosing all primitives, `None` when there are none.
pub fn calculate_geometry_bounding_box(primitives: &[Primitive]) -> Option<BoundingBox> {
  BoundingBox::union_all(primitives.iter().map(|p| &p.bounding_box))
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
