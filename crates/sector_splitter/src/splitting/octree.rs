//! Budgeted octree splitter.
//!
//! Recursively halves space along all three axes. At each level the largest
//! nodes (by diagonal) are kept in the current sector until its byte budget
//! is spent; everything else is pushed down into the eight sub-voxels.
//!
//! ```text
//!   depth < depth_to_start     diagonal < min         otherwise
//!   ┌─────┬─────┐              ┌───────────┐          ┌───────────┐
//!   │  ·  │  ·  │              │           │          │ main: big │
//!   ├─────┼─────┤   spatial    │ main: all │  leaf    │ nodes by  │  budget
//!   │  ·  │  ·  │   only       │           │          │ budget    │
//!   └─────┴─────┘              └───────────┘          └───────────┘
//!   children attach to         one sector, no         sector for main,
//!   the current parent         children               children below it
//! ```
//!
//! The root sector is always emitted first and holds no geometry. Outlier
//! groups are split by the same recursion and attached under the root.

use tracing::{debug, info_span, warn};

use super::outliers::{group_outliers_recursive, split_into_regular_and_outlier};
use super::sector::SectorParent;
use super::voxel::{classify_node, VoxelKey};
use super::{calculate_bounding_box, group_into_nodes, BoundingBox, Node, Sector, SplitReason};
use crate::config::OctreeSplitterConfig;
use crate::cost::CostEstimator;
use crate::error::SplitError;
use crate::id::SequentialIdGenerator;
use crate::types::Primitive;

/// Splits a node set into a budgeted octree of sectors.
#[derive(Clone, Debug, Default)]
pub struct OctreeSplitter {
  config: OctreeSplitterConfig,
}

/// State threaded through one recursion.
struct SplitContext<'a> {
  ids: &'a mut SequentialIdGenerator,
  sectors: &'a mut Vec<Sector>,
  depth_to_start: u32,
  /// Tag every emitted sector as an outlier sector.
  outlier: bool,
}

impl OctreeSplitter {
  pub fn new(config: OctreeSplitterConfig) -> Self {
    Self { config }
  }

  #[inline]
  pub fn config(&self) -> &OctreeSplitterConfig {
    &self.config
  }

  /// Group primitives into nodes, then split them.
  pub fn split_primitives<E>(
    &self,
    primitives: Vec<Primitive>,
    estimator: &E,
    ids: &mut SequentialIdGenerator,
  ) -> Result<Vec<Sector>, SplitError>
  where
    E: CostEstimator + ?Sized,
  {
    let nodes = {
      let _span = info_span!("group_into_nodes").entered();
      group_into_nodes(primitives, estimator)?
    };
    self.split_into_sectors(nodes, ids)
  }

  /// Split `nodes` into sectors, parents before children.
  ///
  /// The first sector is the root. An empty node set yields only an empty
  /// root with a zero bounding box.
  #[tracing::instrument(skip_all, name = "octree::split_into_sectors", fields(nodes = nodes.len()))]
  pub fn split_into_sectors(
    &self,
    nodes: Vec<Node>,
    ids: &mut SequentialIdGenerator,
  ) -> Result<Vec<Sector>, SplitError> {
    let root_id = ids.next_id()?;
    if nodes.is_empty() {
      return Ok(vec![Sector::root(root_id, BoundingBox::ZERO)]);
    }

    let root = Sector::root(root_id, calculate_bounding_box(&nodes)?);
    let root_parent = root.as_parent();
    let mut sectors = vec![root];

    let (regular, outliers) = {
      let _span = info_span!("split_outliers").entered();
      split_into_regular_and_outlier(nodes, self.config.outlier_distance)
    };

    {
      let _span = info_span!("split_regular", nodes = regular.len()).entered();
      self.split_subtree(regular, &root_parent, false, ids, &mut sectors)?;
    }

    if !outliers.is_empty() {
      let _span = info_span!("split_outliers_groups").entered();
      let outlier_count = outliers.len();
      let groups = group_outliers_recursive(outliers, self.config.outlier_grouping_distance);
      warn!(
        outlier_nodes = outlier_count,
        groups = groups.len(),
        "scene contains outlier nodes, placing them in separate sectors"
      );
      for group in groups {
        self.split_subtree(group, &root_parent, true, ids, &mut sectors)?;
      }
    }

    debug!(sectors = sectors.len(), "octree split complete");
    Ok(sectors)
  }

  /// Entry point of one recursion; the start depth follows the size of
  /// this node set.
  fn split_subtree(
    &self,
    nodes: Vec<Node>,
    parent: &SectorParent,
    outlier: bool,
    ids: &mut SequentialIdGenerator,
    sectors: &mut Vec<Sector>,
  ) -> Result<(), SplitError> {
    if nodes.is_empty() {
      return Ok(());
    }
    let diagonal = calculate_bounding_box(&nodes)?.diagonal();
    let mut ctx = SplitContext {
      ids,
      sectors,
      depth_to_start: self.config.start_depth.depth_to_start(diagonal),
      outlier,
    };
    self.split_recursive(nodes, 0, parent, &mut ctx)
  }

  fn split_recursive(
    &self,
    nodes: Vec<Node>,
    depth: u32,
    parent: &SectorParent,
    ctx: &mut SplitContext<'_>,
  ) -> Result<(), SplitError> {
    if nodes.is_empty() {
      return Ok(());
    }

    let bounds = calculate_bounding_box(&nodes)?;

    let (main, sub_voxel, reason) = if depth < ctx.depth_to_start {
      (Vec::new(), nodes, SplitReason::Budget)
    } else if bounds.diagonal() < self.config.min_split_diagonal {
      (nodes, Vec::new(), SplitReason::SizeThreshold)
    } else {
      let (main, rest) = self.select_by_budget(nodes);
      (main, rest, SplitReason::Budget)
    };
    let reason = if ctx.outlier { SplitReason::Outlier } else { reason };

    if sub_voxel.is_empty() {
      self.emit(main, parent, bounds, reason, ctx)?;
      return Ok(());
    }

    let child_parent = if main.is_empty() {
      parent.clone()
    } else {
      self.emit(main, parent, bounds, reason, ctx)?
    };

    let mut buckets: [Vec<Node>; 8] = Default::default();
    for node in sub_voxel {
      let key = classify_node(&node, &bounds);
      let index = key.sub_voxel_index().ok_or(SplitError::MainVoxelBucket)?;
      buckets[index].push(node);
    }

    for (key, bucket) in VoxelKey::SUB_VOXELS.iter().zip(buckets) {
      if bucket.is_empty() {
        continue;
      }
      debug!(?key, depth = depth + 1, nodes = bucket.len(), "descending into sub-voxel");
      self.split_recursive(bucket, depth + 1, &child_parent, ctx)?;
    }
    Ok(())
  }

  /// Take nodes largest-first until the budget is spent.
  ///
  /// Returns `(main, rest)`. Once the remaining budget is negative, a node
  /// is still admitted when no more than `tail_node_count` nodes are left.
  fn select_by_budget(&self, mut nodes: Vec<Node>) -> (Vec<Node>, Vec<Node>) {
    nodes.sort_by(|a, b| b.diagonal.total_cmp(&a.diagonal));

    let total = nodes.len();
    let mut budget_left = i128::from(self.config.sector_byte_budget);
    let mut take = total;
    for (i, node) in nodes.iter().enumerate() {
      if budget_left < 0 && total - i > self.config.tail_node_count {
        take = i;
        break;
      }
      budget_left -= i128::from(node.estimated_byte_size);
    }

    let rest = nodes.split_off(take);
    (nodes, rest)
  }

  fn emit(
    &self,
    nodes: Vec<Node>,
    parent: &SectorParent,
    bounds: BoundingBox,
    reason: SplitReason,
    ctx: &mut SplitContext<'_>,
  ) -> Result<SectorParent, SplitError> {
    let sector_id = ctx.ids.next_id()?;
    let sector = Sector::from_nodes(nodes, sector_id, parent, bounds, reason);
    let reference = sector.as_parent();
    ctx.sectors.push(sector);
    Ok(reference)
  }
}

#[cfg(test)]
#[path = "octree_test.rs"]
mod octree_test;
