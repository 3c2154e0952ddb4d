//! Error type shared by the splitters and the rebalancer.
//!
//! Every variant except [`SplitError::External`] signals a broken invariant
//! inside this crate. Callers must not retry: the computation is
//! deterministic and a second run produces the same failure.

use crate::splitting::SectorId;

/// Boxed error produced by an external collaborator (cost estimator,
/// tessellator).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while splitting or rebalancing a scene.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
  /// A bounding box was requested over an empty node set.
  #[error("need at least 1 node to calculate bounds, the node set was empty")]
  EmptyNodeSet,

  /// The reserved main-voxel key showed up as a sub-voxel bucket.
  #[error("main voxel appeared among sub-voxel buckets; it must be processed separately")]
  MainVoxelBucket,

  /// The sector id generator ran past the float-exact id range.
  #[error("too many ids generated (limit {limit})")]
  IdSpaceExhausted { limit: u64 },

  /// A rebalancing pass lost or duplicated primitives.
  #[error("sector {sector_id}: {pass} changed geometry count from {expected} to {actual}")]
  GeometryCountMismatch {
    sector_id: SectorId,
    pass: &'static str,
    expected: usize,
    actual: usize,
  },

  /// A rebalancing pass changed which owner ids live in a sector.
  #[error("sector {sector_id}: {pass} changed the owner ids of the sector")]
  OwnerSetChanged {
    sector_id: SectorId,
    pass: &'static str,
  },

  /// The emitted sector sequence does not form a well-formed tree.
  #[error("malformed sector tree: {0}")]
  MalformedTree(String),

  /// Error from an external collaborator, passed through unchanged.
  #[error(transparent)]
  External(#[from] BoxError),
}
