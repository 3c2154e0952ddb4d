//! Sector records - the output of the splitters.
//!
//! Sectors form a tree through `parent_sector_id` and a parallel string
//! `path` (`/root/child/grandchild`). They are emitted parents-first and
//! never modified after emission; the rebalancer consumes a sector and
//! returns a new one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{BoundingBox, Node};
use crate::cost::DrawCallEstimator;
use crate::error::SplitError;
use crate::splitting::node::calculate_geometry_bounding_box;
use crate::types::{OwnerId, Primitive};

/// Sector identifier, unique within one composed scene.
pub type SectorId = u32;

/// Why a sector was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitReason {
  #[default]
  None,
  /// Root of a sector tree.
  Root,
  /// Nodes were selected to fill the byte budget.
  Budget,
  /// The subtree was smaller than the minimum split diagonal.
  SizeThreshold,
  /// Holds outlier nodes, far away from the main geometry.
  Outlier,
  /// Highlight sector, packed by owner id.
  Priority,
}

/// Per-sector statistics for tuning and debugging.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorDiagnostics {
  pub split_reason: SplitReason,
  pub node_count: usize,
  pub min_node_diagonal: f32,
  pub max_node_diagonal: f32,
  pub estimated_byte_size: u64,
  pub estimated_triangle_count: u64,
  pub estimated_draw_calls: usize,
  /// Sector belongs to the highlight tree.
  pub is_priority: bool,
}

/// One node of the output sector tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sector {
  pub sector_id: SectorId,
  /// `None` only for the root.
  pub parent_sector_id: Option<SectorId>,
  /// 0 for the root.
  pub depth: u32,
  /// `parent.path + "/" + sector_id`; the root's path is `"/" + sector_id`.
  pub path: String,
  pub geometries: Vec<Primitive>,
  /// Bounds of every node in this sector's subtree.
  pub subtree_bounding_box: BoundingBox,
  /// Bounds of this sector's own geometries, `None` when it has none.
  pub geometry_bounding_box: Option<BoundingBox>,
  pub diagnostics: SectorDiagnostics,
}

/// What a child needs to know about its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectorParent {
  pub sector_id: SectorId,
  pub path: String,
  pub depth: u32,
}

impl SectorParent {
  /// Path of a child with the given id.
  #[inline]
  pub fn child_path(&self, child_id: SectorId) -> String {
    format!("{}/{}", self.path, child_id)
  }
}

impl Sector {
  /// Empty root sector.
  pub fn root(sector_id: SectorId, subtree_bounding_box: BoundingBox) -> Self {
    Self {
      sector_id,
      parent_sector_id: None,
      depth: 0,
      path: format!("/{sector_id}"),
      geometries: Vec::new(),
      subtree_bounding_box,
      geometry_bounding_box: None,
      diagnostics: SectorDiagnostics {
        split_reason: SplitReason::Root,
        ..Default::default()
      },
    }
  }

  /// Sector holding the geometries of `nodes`, attached under `parent`.
  pub fn from_nodes(
    nodes: Vec<Node>,
    sector_id: SectorId,
    parent: &SectorParent,
    subtree_bounding_box: BoundingBox,
    split_reason: SplitReason,
  ) -> Self {
    let mut diagnostics = SectorDiagnostics {
      split_reason,
      node_count: nodes.len(),
      ..Default::default()
    };
    if !nodes.is_empty() {
      diagnostics.min_node_diagonal = nodes.iter().map(|n| n.diagonal).fold(f32::INFINITY, f32::min);
      diagnostics.max_node_diagonal = nodes.iter().map(|n| n.diagonal).fold(0.0, f32::max);
    }

    let mut geometries = Vec::with_capacity(nodes.iter().map(|n| n.geometries.len()).sum());
    for node in nodes {
      diagnostics.estimated_byte_size += node.estimated_byte_size;
      diagnostics.estimated_triangle_count += node.estimated_triangle_count;
      geometries.extend(node.geometries);
    }
    diagnostics.estimated_draw_calls = DrawCallEstimator::draw_calls(&geometries);

    Self {
      sector_id,
      parent_sector_id: Some(parent.sector_id),
      depth: parent.depth + 1,
      path: parent.child_path(sector_id),
      geometry_bounding_box: calculate_geometry_bounding_box(&geometries),
      geometries,
      subtree_bounding_box,
      diagnostics,
    }
  }

  /// Reference used by children of this sector.
  pub fn as_parent(&self) -> SectorParent {
    SectorParent {
      sector_id: self.sector_id,
      path: self.path.clone(),
      depth: self.depth,
    }
  }

  #[inline]
  pub fn is_root(&self) -> bool {
    self.parent_sector_id.is_none()
  }

  /// Owner ids of the sector's geometries (with repetition).
  pub fn owner_ids(&self) -> impl Iterator<Item = OwnerId> + '_ {
    self.geometries.iter().map(|g| g.owner_id)
  }
}

/// Check that `sectors` is a well-formed tree in emission order.
///
/// Exactly one root, unique ids, every parent emitted before its children,
/// and `path(child) == path(parent) + "/" + id(child)`.
pub fn validate_sector_tree(sectors: &[Sector]) -> Result<(), SplitError> {
  let mut paths: HashMap<SectorId, &str> = HashMap::with_capacity(sectors.len());
  let mut root_count = 0;

  for sector in sectors {
    let expected_path = match sector.parent_sector_id {
      None => {
        root_count += 1;
        format!("/{}", sector.sector_id)
      }
      Some(parent_id) => {
        let parent_path = paths.get(&parent_id).ok_or_else(|| {
          SplitError::MalformedTree(format!(
            "sector {} references parent {parent_id} before it was emitted",
            sector.sector_id
          ))
        })?;
        format!("{parent_path}/{}", sector.sector_id)
      }
    };

    if sector.path != expected_path {
      return Err(SplitError::MalformedTree(format!(
        "sector {} has path {:?}, expected {expected_path:?}",
        sector.sector_id, sector.path
      )));
    }
    if paths.insert(sector.sector_id, &sector.path).is_some() {
      return Err(SplitError::MalformedTree(format!(
        "sector id {} emitted twice",
        sector.sector_id
      )));
    }
  }

  if root_count != 1 {
    return Err(SplitError::MalformedTree(format!(
      "expected exactly 1 root sector, found {root_count}"
    )));
  }
  Ok(())
}

#[cfg(test)]
#[path = "sector_test.rs"]
mod sector_test;
