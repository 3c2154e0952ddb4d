//! Tunables for the splitters and the rebalancer.
//!
//! The defaults are empirical values tuned for plant-scale models (meters).
//! Every struct deserializes with `#[serde(default)]`, so a config file only
//! needs to name the values it overrides.

use serde::{Deserialize, Serialize};

/// Controls the depth at which budgeting starts in the octree splitter.
///
/// ```text
/// depth_to_start = clamp(floor(sqrt(diagonal / scale)), min, max)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartDepthConfig {
  /// Diagonal divisor, in meters.
  pub scale: f32,
  /// Lower clamp.
  pub min: u32,
  /// Upper clamp.
  pub max: u32,
}

impl StartDepthConfig {
  pub const DEFAULT: Self = Self {
    scale: 100.0,
    min: 3,
    max: 4,
  };

  /// Number of purely spatial levels before budgeting for a scene with the
  /// given diagonal.
  pub fn depth_to_start(&self, diagonal: f32) -> u32 {
    let raw = (diagonal.max(0.0) / self.scale).sqrt().floor();
    // Saturating cast: NaN becomes 0, huge values become u32::MAX.
    (raw as u32).clamp(self.min, self.max.max(self.min))
  }
}

impl Default for StartDepthConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Configuration for the budgeted octree splitter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeSplitterConfig {
  /// Soft ceiling on a sector's own estimated payload, in bytes.
  pub sector_byte_budget: u64,
  /// Subtrees with a smaller diagonal are never split further.
  pub min_split_diagonal: f32,
  /// Gap in sorted center distances that separates outliers.
  pub outlier_distance: f32,
  /// Gap used when grouping outliers among themselves.
  pub outlier_grouping_distance: f32,
  /// Once the budget is exhausted, nodes keep being admitted while at most
  /// this many remain.
  pub tail_node_count: usize,
  pub start_depth: StartDepthConfig,
}

impl OctreeSplitterConfig {
  pub const DEFAULT: Self = Self {
    sector_byte_budget: 2_500_000,
    min_split_diagonal: 20.0,
    outlier_distance: 20.0,
    outlier_grouping_distance: 20.0,
    tail_node_count: 10,
    start_depth: StartDepthConfig::DEFAULT,
  };
}

impl Default for OctreeSplitterConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Configuration for the priority (highlight) splitter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritySplitterConfig {
  /// Soft ceiling on a highlight sector's payload, in bytes.
  pub sector_byte_budget: u64,
  /// Gap in sorted center distances that separates (discarded) outliers.
  pub outlier_distance: f32,
  /// Geometries with a diagonal at or below this are dropped from a node,
  /// unless every geometry of the node is that small.
  pub small_geometry_cutoff: f32,
}

impl PrioritySplitterConfig {
  pub const DEFAULT: Self = Self {
    sector_byte_budget: 50_000,
    outlier_distance: 20.0,
    small_geometry_cutoff: 0.1,
  };
}

impl Default for PrioritySplitterConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Configuration for the too-few-instances / too-few-primitives passes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalanceConfig {
  /// Curve parameter `a` in `n < a² / t`.
  pub instance_curve: f64,
  /// Template groups with more instances always stay instanced.
  pub max_instances_to_bake: usize,
  /// Template groups with more total triangles always stay instanced.
  pub max_triangles_to_bake: u64,
  /// Non-mesh kinds with fewer members than this get tessellated.
  pub min_primitives_per_kind: usize,
}

impl RebalanceConfig {
  pub const DEFAULT: Self = Self {
    instance_curve: 100.0,
    max_instances_to_bake: 100,
    max_triangles_to_bake: 10_000,
    min_primitives_per_kind: 10,
  };
}

impl Default for RebalanceConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Full configuration of a composer run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
  pub octree: OctreeSplitterConfig,
  pub priority: PrioritySplitterConfig,
  pub rebalance: RebalanceConfig,
  /// Skip the rebalancing passes entirely.
  pub skip_rebalance: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_octree_config() {
    let config = OctreeSplitterConfig::default();
    assert_eq!(config.sector_byte_budget, 2_500_000);
    assert_eq!(config.min_split_diagonal, 20.0);
    assert_eq!(config.tail_node_count, 10);
    assert_eq!(config.start_depth, StartDepthConfig::DEFAULT);
  }

  #[test]
  fn test_default_priority_config() {
    let config = PrioritySplitterConfig::default();
    assert_eq!(config.sector_byte_budget, 50_000);
    assert_eq!(config.outlier_distance, 20.0);
  }

  #[test]
  fn test_depth_to_start_clamps_low() {
    let config = StartDepthConfig::DEFAULT;
    assert_eq!(config.depth_to_start(0.0), 3);
    assert_eq!(config.depth_to_start(346.0), 3);
  }

  #[test]
  fn test_depth_to_start_in_range() {
    let config = StartDepthConfig::DEFAULT;
    // sqrt(1600 / 100) = 4
    assert_eq!(config.depth_to_start(1600.0), 4);
  }

  #[test]
  fn test_depth_to_start_clamps_high() {
    let config = StartDepthConfig::DEFAULT;
    assert_eq!(config.depth_to_start(1.0e6), 4);
    assert_eq!(config.depth_to_start(f32::INFINITY), 4);
  }

  #[test]
  fn test_depth_to_start_handles_nan() {
    assert_eq!(StartDepthConfig::DEFAULT.depth_to_start(f32::NAN), 3);
  }
}
