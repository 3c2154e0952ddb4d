//! Scene files written after composition.
//!
//! Layout of the output directory:
//! - scene.json: both sector trees without geometries, plus stats
//! - sector_<id>.json: one file per sector with its geometries
//! - owner_priority_sectors.json: owner id to highlight sector id

use anyhow::{Context, Result};
use sector_splitter::{
	BoundingBox, ComposedScene, Primitive, Sector, SectorDiagnostics, SectorId, SplitStats,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Input file: a flat list of primitives.
#[derive(Debug, Deserialize)]
pub struct SceneInput {
	pub primitives: Vec<Primitive>,
}

impl SceneInput {
	/// Read and parse an input scene.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read scene file: {}", path.display()))?;
		serde_json::from_str(&content)
			.with_context(|| format!("Failed to parse scene JSON: {}", path.display()))
	}
}

/// A sector without its geometries.
#[derive(Debug, Serialize)]
pub struct SectorEntry<'a> {
	pub sector_id: SectorId,
	pub parent_sector_id: Option<SectorId>,
	pub depth: u32,
	pub path: &'a str,
	pub geometry_count: usize,
	pub subtree_bounding_box: BoundingBox,
	pub geometry_bounding_box: Option<BoundingBox>,
	pub diagnostics: &'a SectorDiagnostics,
}

impl<'a> From<&'a Sector> for SectorEntry<'a> {
	fn from(sector: &'a Sector) -> Self {
		Self {
			sector_id: sector.sector_id,
			parent_sector_id: sector.parent_sector_id,
			depth: sector.depth,
			path: &sector.path,
			geometry_count: sector.geometries.len(),
			subtree_bounding_box: sector.subtree_bounding_box,
			geometry_bounding_box: sector.geometry_bounding_box,
			diagnostics: &sector.diagnostics,
		}
	}
}

/// Contents of scene.json.
#[derive(Debug, Serialize)]
pub struct SceneIndex<'a> {
	pub sectors: Vec<SectorEntry<'a>>,
	pub priority_sectors: Vec<SectorEntry<'a>>,
	pub stats: &'a SplitStats,
	pub priority_stats: &'a SplitStats,
}

impl<'a> SceneIndex<'a> {
	pub fn new(scene: &'a ComposedScene) -> Self {
		Self {
			sectors: scene.sectors.iter().map(SectorEntry::from).collect(),
			priority_sectors: scene.priority_sectors.iter().map(SectorEntry::from).collect(),
			stats: &scene.stats,
			priority_stats: &scene.priority_stats,
		}
	}
}

/// File name of a sector's geometry file.
pub fn sector_file_name(sector_id: SectorId) -> String {
	format!("sector_{sector_id}.json")
}

/// Write every output file into `dir`, creating it if needed. Returns the
/// number of files written.
pub fn write_scene(dir: &Path, scene: &ComposedScene) -> Result<usize> {
	std::fs::create_dir_all(dir)
		.with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

	write_json(&dir.join("scene.json"), &SceneIndex::new(scene))?;

	let mut written = 1;
	for sector in scene.sectors.iter().chain(&scene.priority_sectors) {
		write_json(&dir.join(sector_file_name(sector.sector_id)), sector)?;
		written += 1;
	}

	// JSON object keys must be strings.
	let owners: BTreeMap<String, SectorId> = scene
		.owner_priority_sectors
		.iter()
		.map(|(owner_id, sector_id)| (owner_id.to_string(), *sector_id))
		.collect();
	write_json(&dir.join("owner_priority_sectors.json"), &owners)?;

	Ok(written + 1)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
	let json = serde_json::to_string_pretty(value)
		.with_context(|| format!("Failed to serialize {}", path.display()))?;
	std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
