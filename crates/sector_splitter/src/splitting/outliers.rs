//! Outlier detection for node sets.
//!
//! CAD exports regularly contain stray elements far away from the plant
//! (misplaced origins, survey markers). Left in place they inflate the scene
//! bounds and starve the octree of useful levels, so they are split off and
//! handled separately.
//!
//! Both operations use the same 1-D heuristic: sort nodes by distance from a
//! reference point and cut where consecutive distances jump by at least a
//! threshold. Downstream output depends on its exact cuts.

use glam::Vec3;

use super::Node;

/// Share of coordinates dropped at each end before averaging.
const TRIM_FRACTION: f32 = 0.05;

/// Per-axis trimmed mean of node centers.
///
/// Sorts each axis, drops the lowest and highest `floor(5% of n)` values and
/// averages the rest. Returns `Vec3::ZERO` for an empty slice.
pub fn robust_center(nodes: &[Node]) -> Vec3 {
  if nodes.is_empty() {
    return Vec3::ZERO;
  }

  let trim = (nodes.len() as f32 * TRIM_FRACTION) as usize;
  let mut axis_values: Vec<f32> = Vec::with_capacity(nodes.len());
  let mut center = [0.0f32; 3];

  for (axis, value) in center.iter_mut().enumerate() {
    axis_values.clear();
    axis_values.extend(nodes.iter().map(|n| n.center()[axis]));
    axis_values.sort_by(f32::total_cmp);

    let kept = &axis_values[trim..axis_values.len() - trim];
    *value = kept.iter().sum::<f32>() / kept.len() as f32;
  }

  Vec3::from_array(center)
}

/// Sort nodes by distance from `reference` (stable) and return them with
/// their distances.
fn sort_by_distance(nodes: Vec<Node>, reference: Vec3) -> Vec<(f32, Node)> {
  let mut sorted: Vec<(f32, Node)> = nodes
    .into_iter()
    .map(|node| (node.center().distance(reference), node))
    .collect();
  sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
  sorted
}

/// Index of the first element whose distance exceeds its predecessor's by at
/// least `gap`.
fn first_gap(sorted: &[(f32, Node)], gap: f32) -> Option<usize> {
  (1..sorted.len()).find(|&i| sorted[i].0 - sorted[i - 1].0 >= gap)
}

/// Split nodes into `(regular, outliers)`.
///
/// Nodes are sorted by distance from [`robust_center`]; the first gap of at
/// least `outlier_distance` between consecutive distances separates regular
/// nodes (before) from outliers (after). Without such a gap every node is
/// regular.
pub fn split_into_regular_and_outlier(nodes: Vec<Node>, outlier_distance: f32) -> (Vec<Node>, Vec<Node>) {
  let reference = robust_center(&nodes);
  let sorted = sort_by_distance(nodes, reference);
  let cut = first_gap(&sorted, outlier_distance).unwrap_or(sorted.len());

  let mut regular = Vec::with_capacity(cut);
  let mut outliers = Vec::with_capacity(sorted.len() - cut);
  for (index, (_, node)) in sorted.into_iter().enumerate() {
    if index < cut {
      regular.push(node);
    } else {
      outliers.push(node);
    }
  }

  (regular, outliers)
}

/// Group outliers that are close to each other.
///
/// Sorts by distance from the first node's center and cuts at every gap of
/// at least `grouping_distance`. When that produces more than one group,
/// each group is regrouped relative to its own first node, which separates
/// outliers that sit at the same distance from the reference but on
/// opposite sides of it.
pub fn group_outliers_recursive(outliers: Vec<Node>, grouping_distance: f32) -> Vec<Vec<Node>> {
  if outliers.len() <= 1 {
    return if outliers.is_empty() {
      Vec::new()
    } else {
      vec![outliers]
    };
  }

  let reference = outliers[0].center();
  let sorted = sort_by_distance(outliers, reference);

  let mut groups: Vec<Vec<Node>> = Vec::new();
  let mut previous_distance: Option<f32> = None;
  for (distance, node) in sorted {
    let starts_group = previous_distance.map_or(true, |prev| distance - prev >= grouping_distance);
    if starts_group {
      groups.push(Vec::new());
    }
    if let Some(group) = groups.last_mut() {
      group.push(node);
    }
    previous_distance = Some(distance);
  }

  if groups.len() == 1 {
    return groups;
  }

  groups
    .into_iter()
    .flat_map(|group| group_outliers_recursive(group, grouping_distance))
    .collect()
}

#[cfg(test)]
#[path = "outliers_test.rs"]
mod outliers_test;
