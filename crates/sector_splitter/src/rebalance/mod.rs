//! Per-sector rebalancing.
//!
//! Runs after splitting, on each finished sector:
//! 1. [`instances`] - bake rare instanced templates into triangle meshes
//! 2. [`primitives`] - tessellate rare primitive kinds
//!
//! Both passes replace geometries one-for-one. A pass that changes the
//! geometry count or the owner ids of a sector is a hard error.

pub mod instances;
pub mod primitives;
pub mod tessellate;

pub use instances::{convert_instances_when_too_few, should_bake_instances};
pub use primitives::tessellate_when_too_few;
pub use tessellate::{PrimitiveTessellator, Tessellator};

use crate::config::RebalanceConfig;
use crate::cost::DrawCallEstimator;
use crate::error::SplitError;
use crate::splitting::{Sector, SectorId};
use crate::types::{OwnerId, Primitive};

/// Applies both rebalancing passes to sectors.
#[derive(Clone, Debug, Default)]
pub struct SectorRebalancer<T = PrimitiveTessellator> {
  config: RebalanceConfig,
  tessellator: T,
}

impl SectorRebalancer<PrimitiveTessellator> {
  /// Rebalancer using the built-in tessellator.
  pub fn new(config: RebalanceConfig) -> Self {
    Self::with_tessellator(config, PrimitiveTessellator)
  }
}

impl<T: Tessellator> SectorRebalancer<T> {
  pub fn with_tessellator(config: RebalanceConfig, tessellator: T) -> Self {
    Self { config, tessellator }
  }

  #[inline]
  pub fn config(&self) -> &RebalanceConfig {
    &self.config
  }

  /// Rebalance one sector, returning the updated sector.
  ///
  /// The draw call estimate is recomputed from the new geometries.
  #[tracing::instrument(skip_all, name = "rebalance::sector", fields(sector_id = sector.sector_id))]
  pub fn rebalance(&self, mut sector: Sector) -> Result<Sector, SplitError> {
    if sector.geometries.is_empty() {
      return Ok(sector);
    }

    let expected = OwnerSnapshot::of(&sector.geometries);

    let geometries = std::mem::take(&mut sector.geometries);
    let geometries = convert_instances_when_too_few(geometries, &self.config);
    expected.verify(sector.sector_id, "instance conversion", &geometries)?;

    let geometries = tessellate_when_too_few(geometries, &self.tessellator, &self.config)?;
    expected.verify(sector.sector_id, "primitive tessellation", &geometries)?;

    sector.diagnostics.estimated_draw_calls = DrawCallEstimator::draw_calls(&geometries);
    sector.geometries = geometries;
    Ok(sector)
  }
}

/// Sorted owner ids of a sector's geometries.
struct OwnerSnapshot {
  owners: Vec<OwnerId>,
}

impl OwnerSnapshot {
  fn of(geometries: &[Primitive]) -> Self {
    let mut owners: Vec<OwnerId> = geometries.iter().map(|g| g.owner_id).collect();
    owners.sort_unstable();
    Self { owners }
  }

  fn verify(&self, sector_id: SectorId, pass: &'static str, geometries: &[Primitive]) -> Result<(), SplitError> {
    if geometries.len() != self.owners.len() {
      return Err(SplitError::GeometryCountMismatch {
        sector_id,
        pass,
        expected: self.owners.len(),
        actual: geometries.len(),
      });
    }
    if Self::of(geometries).owners != self.owners {
      return Err(SplitError::OwnerSetChanged { sector_id, pass });
    }
    Ok(())
  }
}
