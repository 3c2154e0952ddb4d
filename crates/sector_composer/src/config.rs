//! Composer configuration loading.

use anyhow::{Context, Result};
use sector_splitter::ComposerConfig;
use std::path::Path;

/// Load the composer configuration from a TOML file, or the defaults when no
/// file is given.
pub fn load(path: Option<&Path>) -> Result<ComposerConfig> {
	let Some(path) = path else {
		return Ok(ComposerConfig::default());
	};
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read config file: {}", path.display()))?;
	parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parse and validate a TOML configuration.
pub fn parse(content: &str) -> Result<ComposerConfig> {
	let config: ComposerConfig =
		toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
	validate(&config)?;
	Ok(config)
}

fn validate(config: &ComposerConfig) -> Result<()> {
	let octree = &config.octree;
	if octree.sector_byte_budget == 0 {
		anyhow::bail!("octree.sector_byte_budget must be positive");
	}
	if !(octree.min_split_diagonal > 0.0) {
		anyhow::bail!(
			"octree.min_split_diagonal must be positive, got {}",
			octree.min_split_diagonal
		);
	}
	if !(octree.outlier_distance > 0.0) || !(octree.outlier_grouping_distance > 0.0) {
		anyhow::bail!("octree outlier distances must be positive");
	}
	if !(octree.start_depth.scale > 0.0) {
		anyhow::bail!("octree.start_depth.scale must be positive");
	}
	if octree.start_depth.min > octree.start_depth.max {
		anyhow::bail!(
			"octree.start_depth.min ({}) exceeds max ({})",
			octree.start_depth.min,
			octree.start_depth.max
		);
	}

	let priority = &config.priority;
	if priority.sector_byte_budget == 0 {
		anyhow::bail!("priority.sector_byte_budget must be positive");
	}
	if !(priority.outlier_distance > 0.0) {
		anyhow::bail!("priority.outlier_distance must be positive");
	}
	if !(priority.small_geometry_cutoff >= 0.0) {
		anyhow::bail!("priority.small_geometry_cutoff must not be negative");
	}

	if !(config.rebalance.instance_curve >= 0.0) {
		anyhow::bail!("rebalance.instance_curve must not be negative");
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use sector_splitter::{OctreeSplitterConfig, RebalanceConfig};

	#[test]
	fn test_missing_file_uses_defaults() {
		assert_eq!(load(None).unwrap(), ComposerConfig::default());
	}

	#[test]
	fn test_empty_config_uses_defaults() {
		assert_eq!(parse("").unwrap(), ComposerConfig::default());
	}

	#[test]
	fn test_partial_override() {
		let config = parse(
			r#"
skip_rebalance = true

[octree]
sector_byte_budget = 1000000
tail_node_count = 4

[octree.start_depth]
max = 6
"#,
		)
		.unwrap();

		assert!(config.skip_rebalance);
		assert_eq!(config.octree.sector_byte_budget, 1_000_000);
		assert_eq!(config.octree.tail_node_count, 4);
		assert_eq!(config.octree.start_depth.max, 6);
		assert_eq!(config.octree.start_depth.min, 3);
		assert_eq!(
			config.octree.min_split_diagonal,
			OctreeSplitterConfig::DEFAULT.min_split_diagonal
		);
		assert_eq!(config.rebalance, RebalanceConfig::DEFAULT);
	}

	#[test]
	fn test_rejects_zero_budget() {
		let err = parse("[priority]\nsector_byte_budget = 0\n").unwrap_err();
		assert!(err.to_string().contains("priority.sector_byte_budget"));
	}

	#[test]
	fn test_rejects_inverted_start_depth() {
		let err = parse("[octree.start_depth]\nmin = 5\nmax = 2\n").unwrap_err();
		assert!(err.to_string().contains("start_depth.min"));
	}

	#[test]
	fn test_rejects_malformed_toml() {
		assert!(parse("[octree\nsector_byte_budget = ").is_err());
	}

	#[test]
	fn test_rejects_unreadable_file() {
		let path = Path::new("/nonexistent/composer.toml");
		let err = load(Some(path)).unwrap_err();
		assert!(err.to_string().contains("Failed to read config file"));
	}
}
