//! sector_splitter - Budgeted sector trees for streaming large CAD scenes
//!
//! Plant-scale CAD models are far too large to load at once. This crate
//! divides a flat list of primitives into a tree of sectors so a viewer can
//! stream the parts it needs:
//!
//! - **Octree splitter**: recursive spatial subdivision where each sector
//!   keeps its largest nodes up to a byte budget
//! - **Outlier handling**: stray geometry far from the model gets separate
//!   sectors instead of inflating the scene bounds
//! - **Priority splitter**: flat highlight tree over prioritized primitives
//! - **Rebalancer**: bakes rare instanced templates and tessellates rare
//!   primitive kinds to cut draw calls
//!
//! # Example
//!
//! ```ignore
//! use sector_splitter::{ComposerConfig, SceneComposer};
//!
//! let primitives = load_primitives()?;
//! let scene = SceneComposer::new(ComposerConfig::default()).compose(primitives)?;
//!
//! for sector in &scene.sectors {
//!     println!("{} ({} geometries)", sector.path, sector.geometries.len());
//! }
//! ```

pub mod composer;
pub mod config;
pub mod cost;
pub mod error;
pub mod id;
pub mod rebalance;
pub mod splitting;
pub mod types;

// Re-export commonly used items
pub use composer::{owner_sector_map, ComposedScene, SceneComposer};
pub use config::{ComposerConfig, OctreeSplitterConfig, PrioritySplitterConfig, RebalanceConfig, StartDepthConfig};
pub use cost::{CostEstimator, DrawCallEstimator};
pub use error::{BoxError, SplitError};
pub use id::{SequentialIdGenerator, MAX_ID};
pub use rebalance::{PrimitiveTessellator, SectorRebalancer, Tessellator};
pub use splitting::{
  validate_sector_tree, BoundingBox, Node, OctreeSplitter, PrioritySplitter, Sector, SectorDiagnostics, SectorId,
  SplitReason, SplitStats, VoxelKey,
};
pub use types::{Geometry, GeometryKind, Mesh, OwnerId, Primitive, TemplateId};
