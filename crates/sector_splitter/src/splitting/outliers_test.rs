use glam::Vec3;

use super::*;
use crate::splitting::test_utils::node_at;
use crate::splitting::BoundingBox;

fn nodes_at(centers: &[Vec3]) -> Vec<Node> {
  centers
    .iter()
    .enumerate()
    .map(|(i, c)| node_at(i as u64, *c, 1.0, 1))
    .collect()
}

fn owner_ids(nodes: &[Node]) -> Vec<u64> {
  let mut ids: Vec<u64> = nodes.iter().map(|n| n.owner_id).collect();
  ids.sort_unstable();
  ids
}

// =========================================================================
// Robust center
// =========================================================================

#[test]
fn test_robust_center_small_set_is_mean() {
  // Fewer than 20 nodes: nothing is trimmed.
  let nodes = nodes_at(&[Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0)]);
  assert_eq!(robust_center(&nodes), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_robust_center_trims_extremes() {
  // 20 nodes: one value trimmed at each end per axis.
  let mut centers: Vec<Vec3> = (0..18).map(|_| Vec3::splat(1.0)).collect();
  centers.push(Vec3::splat(-1000.0));
  centers.push(Vec3::splat(1000.0));

  let center = robust_center(&nodes_at(&centers));

  assert_eq!(center, Vec3::splat(1.0));
}

#[test]
fn test_robust_center_empty() {
  assert_eq!(robust_center(&[]), Vec3::ZERO);
}

// =========================================================================
// Regular / outlier split
// =========================================================================

/// Nodes at x = 0, 1, 2 are regular; x = 100 is an outlier.
#[test]
fn test_split_single_far_node() {
  let nodes = nodes_at(&[
    Vec3::ZERO,
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(2.0, 0.0, 0.0),
    Vec3::new(100.0, 0.0, 0.0),
  ]);

  let (regular, outliers) = split_into_regular_and_outlier(nodes, 20.0);

  assert_eq!(owner_ids(&regular), vec![0, 1, 2]);
  assert_eq!(owner_ids(&outliers), vec![3]);
}

/// Boxes with swapped corners are still placed by their center.
#[test]
fn test_split_with_inverted_boxes() {
  let mut nodes = nodes_at(&[Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO]);
  let boxes = [
    BoundingBox::new(Vec3::ONE, Vec3::ZERO),
    BoundingBox::new(Vec3::ZERO, Vec3::ONE),
    BoundingBox::new(Vec3::splat(99.0), Vec3::splat(100.0)),
    BoundingBox::new(Vec3::ONE, Vec3::ONE),
  ];
  for (node, bounds) in nodes.iter_mut().zip(boxes) {
    node.bounding_box = bounds;
  }

  let (regular, outliers) = split_into_regular_and_outlier(nodes, 20.0);

  assert_eq!(regular.len(), 3);
  assert_eq!(owner_ids(&outliers), vec![2]);
}

/// Without a large gap every node is regular.
#[test]
fn test_split_without_gap_keeps_all() {
  let centers: Vec<Vec3> = (0..50).map(|i| Vec3::new(i as f32 * 5.0, 0.0, 0.0)).collect();

  let (regular, outliers) = split_into_regular_and_outlier(nodes_at(&centers), 20.0);

  assert_eq!(regular.len(), 50);
  assert!(outliers.is_empty());
}

/// Everything after the first gap is an outlier, even if close together.
#[test]
fn test_split_cuts_at_first_gap() {
  let nodes = nodes_at(&[
    Vec3::ZERO,
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(300.0, 0.0, 0.0),
    Vec3::new(301.0, 0.0, 0.0),
    Vec3::new(900.0, 0.0, 0.0),
  ]);

  let (regular, outliers) = split_into_regular_and_outlier(nodes, 20.0);

  // Mean x = 300.4: distances 300.4, 299.4, 0.4, 0.6, 599.6.
  assert_eq!(owner_ids(&regular), vec![2, 3]);
  assert_eq!(owner_ids(&outliers), vec![0, 1, 4]);
}

#[test]
fn test_split_empty() {
  let (regular, outliers) = split_into_regular_and_outlier(Vec::new(), 20.0);
  assert!(regular.is_empty());
  assert!(outliers.is_empty());
}

// =========================================================================
// Outlier grouping
// =========================================================================

#[test]
fn test_group_outliers_two_groups() {
  let nodes = nodes_at(&[Vec3::splat(0.5), Vec3::splat(99.5), Vec3::splat(1.0)]);

  let groups = group_outliers_recursive(nodes, 10.0);

  assert_eq!(groups.len(), 2);
  assert_eq!(owner_ids(&groups[0]), vec![0, 2]);
  assert_eq!(owner_ids(&groups[1]), vec![1]);
}

/// Nodes equally far from the reference on opposite sides are separated.
#[test]
fn test_group_outliers_symmetrical() {
  let nodes = nodes_at(&[Vec3::ZERO, Vec3::splat(95.0), Vec3::splat(-95.0)]);

  let groups = group_outliers_recursive(nodes, 10.0);

  assert_eq!(groups.len(), 3);
}

#[test]
fn test_group_outliers_keeps_every_node() {
  let centers: Vec<Vec3> = (0..12)
    .map(|i| Vec3::new((i % 3) as f32 * 500.0, (i / 3) as f32, 0.0))
    .collect();

  let groups = group_outliers_recursive(nodes_at(&centers), 20.0);

  let total: usize = groups.iter().map(Vec::len).sum();
  assert_eq!(total, 12);
  assert_eq!(groups.len(), 3);
}

#[test]
fn test_group_outliers_trivial_inputs() {
  assert!(group_outliers_recursive(Vec::new(), 10.0).is_empty());
  let single = group_outliers_recursive(nodes_at(&[Vec3::ZERO]), 10.0);
  assert_eq!(single.len(), 1);
}
