//! Sector splitting.
//!
//! Turns a flat list of primitives into sector trees:
//! - [`OctreeSplitter`] - the main, spatially budgeted tree
//! - [`PrioritySplitter`] - a flat highlight tree over prioritized primitives
//!
//! Both work on [`Node`]s (all primitives of one owner) and emit [`Sector`]s
//! parents-first.

pub mod bounds;
pub mod node;
pub mod octree;
pub mod outliers;
pub mod priority;
pub mod sector;
pub mod stats;
pub mod voxel;

#[cfg(test)]
pub mod test_utils;

pub use bounds::BoundingBox;
pub use node::{calculate_bounding_box, calculate_geometry_bounding_box, group_by_owner, group_into_nodes, Node};
pub use octree::OctreeSplitter;
pub use outliers::{group_outliers_recursive, robust_center, split_into_regular_and_outlier};
pub use priority::PrioritySplitter;
pub use sector::{validate_sector_tree, Sector, SectorDiagnostics, SectorId, SectorParent, SplitReason};
pub use stats::SplitStats;
pub use voxel::{classify_node, VoxelKey};
