//! Scene composition - runs both splitters and the rebalancer.
//!
//! ```text
//!   primitives ──► OctreeSplitter ───► rebalance ─┬─► validate ─► ComposedScene
//!        │          ids 0..k                      │
//!        └──► PrioritySplitter ──► rebalance ─────┘
//!               ids k..
//! ```
//!
//! The priority generator is seeded with the octree generator's next id, so
//! the two trees never share a sector id.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, info_span};

use crate::config::ComposerConfig;
use crate::cost::{CostEstimator, DrawCallEstimator};
use crate::error::SplitError;
use crate::id::{SequentialIdGenerator, MAX_ID};
use crate::rebalance::{PrimitiveTessellator, SectorRebalancer, Tessellator};
use crate::splitting::{validate_sector_tree, OctreeSplitter, PrioritySplitter, Sector, SectorId, SplitStats};
use crate::types::{OwnerId, Primitive};

/// Output of one composer run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComposedScene {
  /// Main octree, root first.
  pub sectors: Vec<Sector>,
  /// Highlight tree, root first.
  pub priority_sectors: Vec<Sector>,
  /// Highlight sector of every prioritized owner.
  pub owner_priority_sectors: BTreeMap<OwnerId, SectorId>,
  pub stats: SplitStats,
  pub priority_stats: SplitStats,
}

/// Splits a scene into the main and highlight sector trees.
pub struct SceneComposer<E = DrawCallEstimator, T = PrimitiveTessellator> {
  config: ComposerConfig,
  estimator: E,
  rebalancer: SectorRebalancer<T>,
}

impl SceneComposer<DrawCallEstimator, PrimitiveTessellator> {
  /// Composer with the built-in estimator and tessellator.
  pub fn new(config: ComposerConfig) -> Self {
    Self::with_parts(config, DrawCallEstimator, PrimitiveTessellator)
  }
}

impl<E, T> SceneComposer<E, T>
where
  E: CostEstimator,
  T: Tessellator,
{
  pub fn with_parts(config: ComposerConfig, estimator: E, tessellator: T) -> Self {
    Self {
      rebalancer: SectorRebalancer::with_tessellator(config.rebalance, tessellator),
      config,
      estimator,
    }
  }

  #[inline]
  pub fn config(&self) -> &ComposerConfig {
    &self.config
  }

  /// Split `primitives` into both sector trees.
  #[tracing::instrument(skip_all, name = "composer::compose", fields(primitives = primitives.len()))]
  pub fn compose(&self, primitives: Vec<Primitive>) -> Result<ComposedScene, SplitError> {
    let prioritized: Vec<Primitive> = primitives.iter().filter(|p| p.is_prioritized()).cloned().collect();

    let mut ids = SequentialIdGenerator::default();
    let sectors = OctreeSplitter::new(self.config.octree).split_primitives(primitives, &self.estimator, &mut ids)?;

    let seed = u32::try_from(ids.peek()).map_err(|_| SplitError::IdSpaceExhausted { limit: MAX_ID })?;
    let mut priority_ids = SequentialIdGenerator::new(seed);
    let priority_sectors =
      PrioritySplitter::new(self.config.priority).split_into_sectors(prioritized, &self.estimator, &mut priority_ids)?;

    let (sectors, priority_sectors) = if self.config.skip_rebalance {
      (sectors, priority_sectors)
    } else {
      let _span = info_span!("rebalance").entered();
      let (sectors, priority_sectors) =
        rayon::join(|| self.rebalance_all(sectors), || self.rebalance_all(priority_sectors));
      (sectors?, priority_sectors?)
    };

    {
      let _span = info_span!("validate").entered();
      validate_sector_tree(&sectors)?;
      validate_sector_tree(&priority_sectors)?;
    }

    let owner_priority_sectors = owner_sector_map(&priority_sectors);
    let stats = SplitStats::from_sectors(&sectors);
    let priority_stats = SplitStats::from_sectors(&priority_sectors);
    log_stats("octree", &stats);
    log_stats("priority", &priority_stats);

    Ok(ComposedScene {
      sectors,
      priority_sectors,
      owner_priority_sectors,
      stats,
      priority_stats,
    })
  }

  fn rebalance_all(&self, sectors: Vec<Sector>) -> Result<Vec<Sector>, SplitError> {
    sectors
      .into_par_iter()
      .map(|sector| self.rebalancer.rebalance(sector))
      .collect()
  }
}

/// Owner id to the first sector holding one of its geometries.
pub fn owner_sector_map(sectors: &[Sector]) -> BTreeMap<OwnerId, SectorId> {
  let mut map = BTreeMap::new();
  for sector in sectors {
    for owner_id in sector.owner_ids() {
      map.entry(owner_id).or_insert(sector.sector_id);
    }
  }
  map
}

fn log_stats(tree: &str, stats: &SplitStats) {
  info!(
    tree,
    sectors = stats.sector_count,
    leaves = stats.leaf_count,
    max_depth = stats.max_depth,
    geometries = stats.geometry_count,
    total_bytes = stats.total_estimated_bytes,
    largest_sector_bytes = stats.largest_sector_bytes,
    outlier_sectors = stats.outlier_sector_count,
    "sector tree ready"
  );
}

#[cfg(test)]
#[path = "composer_test.rs"]
mod composer_test;
