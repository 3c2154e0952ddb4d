//! Too-few-primitives pass.
//!
//! A primitive kind with only a handful of members in a sector still costs
//! one draw call. Those members are tessellated so they join the sector's
//! triangle mesh batch instead.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::debug;

use super::tessellate::Tessellator;
use crate::config::RebalanceConfig;
use crate::error::SplitError;
use crate::types::{GeometryKind, Primitive};

/// Indices of one kind's members; rare kinds are the ones we touch.
type KindMembers = SmallVec<[usize; 16]>;

/// Tessellate the members of every non-mesh kind that has fewer than
/// `min_primitives_per_kind` members.
///
/// A kind is converted when at least one member tessellates; members the
/// tessellator declines stay as they are. Order and count are preserved.
pub fn tessellate_when_too_few<T>(
  mut geometries: Vec<Primitive>,
  tessellator: &T,
  config: &RebalanceConfig,
) -> Result<Vec<Primitive>, SplitError>
where
  T: Tessellator + ?Sized,
{
  let mut kinds: BTreeMap<GeometryKind, KindMembers> = BTreeMap::new();
  for (index, geometry) in geometries.iter().enumerate() {
    let kind = geometry.kind();
    if !kind.is_mesh() {
      kinds.entry(kind).or_default().push(index);
    }
  }

  for (kind, members) in kinds {
    if members.len() >= config.min_primitives_per_kind {
      continue;
    }

    let mut tessellated: SmallVec<[(usize, Primitive); 16]> = SmallVec::new();
    for &index in &members {
      if let Some(mesh) = tessellator.try_tessellate(&geometries[index])? {
        tessellated.push((index, mesh));
      }
    }
    if tessellated.is_empty() {
      continue;
    }

    debug!(?kind, members = members.len(), tessellated = tessellated.len(), "tessellating rare primitive kind");
    for (index, mesh) in tessellated {
      geometries[index] = mesh;
    }
  }

  Ok(geometries)
}
