//! Too-few-instances pass.
//!
//! Every distinct template in a sector costs the viewer a separate instanced
//! batch. When a template has only a few small instances the batch costs
//! more than the triangles it saves, so the instances are baked into plain
//! triangle meshes.
//!
//! ```text
//!   n = instances of the template in the sector
//!   t = template triangles × n
//!
//!   bake  ⇔  n ≤ max_instances  ∧  t ≤ max_triangles  ∧  n < a² / t
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::tessellate::with_mesh;
use crate::config::RebalanceConfig;
use crate::types::{Geometry, Primitive, TemplateId};

/// Whether a template group of `instance_count` instances totalling
/// `triangle_count` triangles should be baked into triangle meshes.
pub fn should_bake_instances(instance_count: usize, triangle_count: u64, config: &RebalanceConfig) -> bool {
  if instance_count > config.max_instances_to_bake || triangle_count > config.max_triangles_to_bake {
    return false;
  }
  if triangle_count == 0 {
    return true;
  }
  let curve = config.instance_curve * config.instance_curve;
  (instance_count as f64) < curve / triangle_count as f64
}

/// Bake instanced meshes of templates that are too rare in this sector.
///
/// Keeps geometry order; each baked instance keeps its owner id and
/// bounding box.
pub fn convert_instances_when_too_few(geometries: Vec<Primitive>, config: &RebalanceConfig) -> Vec<Primitive> {
  // template id -> (instances, triangles per instance)
  let mut templates: BTreeMap<TemplateId, (usize, u64)> = BTreeMap::new();
  for geometry in &geometries {
    if let Geometry::InstancedMesh {
      template_id, template, ..
    } = &geometry.geometry
    {
      let entry = templates
        .entry(*template_id)
        .or_insert((0, template.triangle_count() as u64));
      entry.0 += 1;
    }
  }

  let to_bake: BTreeSet<TemplateId> = templates
    .iter()
    .filter(|&(_, &(count, triangles))| should_bake_instances(count, triangles * count as u64, config))
    .map(|(&id, _)| id)
    .collect();
  if to_bake.is_empty() {
    return geometries;
  }
  debug!(templates = to_bake.len(), "baking rare instanced templates");

  geometries
    .into_iter()
    .map(|primitive| {
      let baked = match &primitive.geometry {
        Geometry::InstancedMesh {
          template_id,
          template,
          instance_matrix,
        } if to_bake.contains(template_id) => Some(template.transformed(instance_matrix)),
        _ => None,
      };
      match baked {
        Some(mesh) => with_mesh(&primitive, mesh),
        None => primitive,
      }
    })
    .collect()
}
