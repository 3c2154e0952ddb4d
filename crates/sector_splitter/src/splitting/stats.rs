//! Summary statistics over a sector tree.

use std::collections::HashSet;

use serde::Serialize;

use super::{Sector, SectorId, SplitReason};

/// Aggregate numbers for one split, logged by the composer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitStats {
  /// Number of sectors, root included.
  pub sector_count: usize,
  /// Sectors without children.
  pub leaf_count: usize,
  /// Deepest sector depth (root = 0).
  pub max_depth: u32,
  /// Geometries across all sectors.
  pub geometry_count: usize,
  /// Sum of the sectors' estimated byte sizes.
  pub total_estimated_bytes: u64,
  /// Largest single sector payload.
  pub largest_sector_bytes: u64,
  /// Sectors holding outlier geometry.
  pub outlier_sector_count: usize,
}

impl SplitStats {
  /// Collect statistics from sectors in any order.
  pub fn from_sectors(sectors: &[Sector]) -> Self {
    let parents: HashSet<SectorId> = sectors.iter().filter_map(|s| s.parent_sector_id).collect();

    let mut stats = Self {
      sector_count: sectors.len(),
      ..Default::default()
    };
    for sector in sectors {
      if !parents.contains(&sector.sector_id) {
        stats.leaf_count += 1;
      }
      if sector.diagnostics.split_reason == SplitReason::Outlier {
        stats.outlier_sector_count += 1;
      }
      let bytes = sector.diagnostics.estimated_byte_size;
      stats.max_depth = stats.max_depth.max(sector.depth);
      stats.geometry_count += sector.geometries.len();
      stats.total_estimated_bytes += bytes;
      stats.largest_sector_bytes = stats.largest_sector_bytes.max(bytes);
    }
    stats
  }
}
