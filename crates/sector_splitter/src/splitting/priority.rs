//! Priority (highlight) splitter.
//!
//! Builds a flat auxiliary tree from primitives flagged with a priority,
//! loaded on demand when the viewer highlights them. Nodes are packed in
//! owner id order rather than spatially, since related owners tend to have
//! neighbouring ids.
//!
//! ```text
//!   root
//!    ├── PIPE    [owners 3, 8, 12, ...]  [owners 40, 41, ...]
//!    └── CABLE   [owners 5, 9, ...]
//! ```

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info_span};

use super::node::{calculate_geometry_bounding_box, group_by_owner};
use super::outliers::split_into_regular_and_outlier;
use super::sector::SectorParent;
use super::{calculate_bounding_box, BoundingBox, Node, Sector, SplitReason};
use crate::config::PrioritySplitterConfig;
use crate::cost::CostEstimator;
use crate::error::SplitError;
use crate::id::SequentialIdGenerator;
use crate::types::Primitive;

/// Packs prioritized nodes into depth-1 sectors under a shared root.
#[derive(Clone, Debug, Default)]
pub struct PrioritySplitter {
  config: PrioritySplitterConfig,
}

impl PrioritySplitter {
  pub fn new(config: PrioritySplitterConfig) -> Self {
    Self { config }
  }

  #[inline]
  pub fn config(&self) -> &PrioritySplitterConfig {
    &self.config
  }

  /// Split the prioritized subset of `primitives` into highlight sectors.
  ///
  /// Primitives with priority 0 are ignored. The root is always emitted,
  /// with a zero bounding box when nothing is prioritized.
  #[tracing::instrument(skip_all, name = "priority::split_into_sectors", fields(primitives = primitives.len()))]
  pub fn split_into_sectors<E>(
    &self,
    primitives: Vec<Primitive>,
    estimator: &E,
    ids: &mut SequentialIdGenerator,
  ) -> Result<Vec<Sector>, SplitError>
  where
    E: CostEstimator + ?Sized,
  {
    let prioritized: Vec<Primitive> = primitives.into_iter().filter(Primitive::is_prioritized).collect();

    let root_bounds = calculate_geometry_bounding_box(&prioritized).unwrap_or(BoundingBox::ZERO);
    let root = Sector::root(ids.next_id()?, root_bounds);
    let root_parent = root.as_parent();
    let mut sectors = vec![root];

    for (discipline, group) in group_by_discipline(prioritized) {
      let _span = info_span!("discipline", discipline = discipline.as_deref().unwrap_or("<none>")).entered();

      let nodes = self.nodes_for_discipline(group, estimator)?;
      let (mut regular, outliers) = split_into_regular_and_outlier(nodes, self.config.outlier_distance);
      if !outliers.is_empty() {
        debug!(discarded = outliers.len(), "discarding prioritized outlier nodes");
      }

      regular.sort_by_key(|node| node.owner_id);
      self.pack(regular, &root_parent, ids, &mut sectors)?;
    }

    debug!(sectors = sectors.len(), "priority split complete");
    Ok(sectors)
  }

  fn nodes_for_discipline<E>(&self, primitives: Vec<Primitive>, estimator: &E) -> Result<Vec<Node>, SplitError>
  where
    E: CostEstimator + ?Sized,
  {
    let cutoff = self.config.small_geometry_cutoff;
    group_by_owner(primitives)
      .into_par_iter()
      .map(|(owner_id, geometries)| Node::from_primitives(owner_id, drop_small_geometries(geometries, cutoff), estimator))
      .collect()
  }

  /// Greedy packing: a new sector starts before a node once the remaining
  /// budget is negative.
  fn pack(
    &self,
    nodes: Vec<Node>,
    root: &SectorParent,
    ids: &mut SequentialIdGenerator,
    sectors: &mut Vec<Sector>,
  ) -> Result<(), SplitError> {
    let budget = i128::from(self.config.sector_byte_budget);
    let mut budget_left = budget;
    let mut current: Vec<Node> = Vec::new();

    for node in nodes {
      if budget_left < 0 {
        sectors.push(Self::priority_sector(std::mem::take(&mut current), root, ids)?);
        budget_left = budget;
      }
      budget_left -= i128::from(node.estimated_byte_size);
      current.push(node);
    }
    if !current.is_empty() {
      sectors.push(Self::priority_sector(current, root, ids)?);
    }
    Ok(())
  }

  fn priority_sector(
    nodes: Vec<Node>,
    root: &SectorParent,
    ids: &mut SequentialIdGenerator,
  ) -> Result<Sector, SplitError> {
    let bounds = calculate_bounding_box(&nodes)?;
    let mut sector = Sector::from_nodes(nodes, ids.next_id()?, root, bounds, SplitReason::Priority);
    sector.diagnostics.is_priority = true;
    Ok(sector)
  }
}

/// Group primitives by discipline, in order of first appearance.
fn group_by_discipline(primitives: Vec<Primitive>) -> Vec<(Option<String>, Vec<Primitive>)> {
  let mut index: HashMap<Option<String>, usize> = HashMap::new();
  let mut groups: Vec<(Option<String>, Vec<Primitive>)> = Vec::new();
  for primitive in primitives {
    let slot = *index.entry(primitive.discipline.clone()).or_insert_with(|| {
      groups.push((primitive.discipline.clone(), Vec::new()));
      groups.len() - 1
    });
    groups[slot].1.push(primitive);
  }
  groups
}

/// Drop geometries with a diagonal at or below `cutoff`, unless that would
/// drop all of them.
fn drop_small_geometries(geometries: Vec<Primitive>, cutoff: f32) -> Vec<Primitive> {
  if geometries.iter().all(|g| g.bounding_box.diagonal() <= cutoff) {
    return geometries;
  }
  geometries
    .into_iter()
    .filter(|g| g.bounding_box.diagonal() > cutoff)
    .collect()
}

#[cfg(test)]
#[path = "priority_test.rs"]
mod priority_test;
