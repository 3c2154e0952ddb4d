use glam::Vec3;

use super::*;
use crate::cost::DrawCallEstimator;
use crate::splitting::test_utils::{box_primitive, FixedCostEstimator};
use crate::splitting::validate_sector_tree;

const PIPE: &str = "PIPE";
const CABLE: &str = "CABLE";

fn prioritized_box(owner_id: u64, x: f32, discipline: &str) -> Primitive {
  box_primitive(owner_id, Vec3::new(x, 0.0, 0.0), 1.0)
    .with_discipline(discipline)
    .with_priority(1)
}

fn split(primitives: Vec<Primitive>) -> Vec<Sector> {
  PrioritySplitter::default()
    .split_into_sectors(primitives, &DrawCallEstimator, &mut SequentialIdGenerator::default())
    .unwrap()
}

#[test]
fn test_one_sector_per_discipline() {
  let primitives = vec![prioritized_box(0, 0.0, PIPE), prioritized_box(1, 2.0, CABLE)];

  let sectors = split(primitives);

  assert_eq!(sectors.len(), 3);
  assert_eq!(sectors[1].geometries[0].discipline.as_deref(), Some(PIPE));
  assert_eq!(sectors[2].geometries[0].discipline.as_deref(), Some(CABLE));
}

/// x = -40 and 40 are outliers and dropped.
#[test]
fn test_far_primitives_are_discarded() {
  let primitives = [-40.0, -10.0, 0.0, 10.0, 40.0]
    .iter()
    .enumerate()
    .map(|(i, x)| prioritized_box(i as u64, *x, PIPE))
    .collect();

  let sectors = split(primitives);

  assert_eq!(sectors.len(), 2);
  assert_eq!(sectors[1].geometries.len(), 3);
  let mut owners: Vec<u64> = sectors[1].owner_ids().collect();
  owners.sort_unstable();
  assert_eq!(owners, vec![1, 2, 3]);
}

#[test]
fn test_packs_by_budget_in_owner_order() {
  // Owner ids run opposite to position.
  let primitives = (0..30)
    .map(|i| prioritized_box(29 - i as u64, i as f32, PIPE))
    .collect();
  let splitter = PrioritySplitter::default();

  let sectors = splitter
    .split_into_sectors(primitives, &FixedCostEstimator::new(5_000), &mut SequentialIdGenerator::default())
    .unwrap();

  // 50,000 bytes fit 10 nodes exactly; the 11th overdraws, the 12th starts a new sector.
  let sizes: Vec<usize> = sectors[1..].iter().map(|s| s.geometries.len()).collect();
  assert_eq!(sizes, vec![11, 11, 8]);
  assert_eq!(sectors[1].owner_ids().collect::<Vec<_>>(), (0..11).collect::<Vec<_>>());
}

#[test]
fn test_sectors_hang_off_root() {
  let primitives = (0..40)
    .map(|i| prioritized_box(i, (i % 10) as f32, if i % 2 == 0 { PIPE } else { CABLE }))
    .collect();

  let sectors = PrioritySplitter::default()
    .split_into_sectors(primitives, &FixedCostEstimator::new(20_000), &mut SequentialIdGenerator::new(500))
    .unwrap();

  validate_sector_tree(&sectors).unwrap();
  assert_eq!(sectors[0].sector_id, 500);
  assert!(!sectors[0].diagnostics.is_priority);
  for sector in &sectors[1..] {
    assert_eq!(sector.parent_sector_id, Some(500));
    assert_eq!(sector.depth, 1);
    assert_eq!(sector.diagnostics.split_reason, SplitReason::Priority);
    assert!(sector.diagnostics.is_priority);
  }
}

#[test]
fn test_unprioritized_primitives_are_ignored() {
  let primitives = vec![
    prioritized_box(1, 0.0, PIPE),
    box_primitive(2, Vec3::new(1.0, 0.0, 0.0), 1.0).with_discipline(PIPE),
  ];

  let sectors = split(primitives);

  assert_eq!(sectors.len(), 2);
  assert_eq!(sectors[1].owner_ids().collect::<Vec<_>>(), vec![1]);
  assert_eq!(
    sectors[0].subtree_bounding_box,
    BoundingBox::new(Vec3::ZERO, Vec3::ONE)
  );
}

#[test]
fn test_nothing_prioritized_yields_empty_root() {
  let primitives = vec![box_primitive(1, Vec3::ZERO, 1.0)];

  let sectors = split(primitives);

  assert_eq!(sectors.len(), 1);
  assert_eq!(sectors[0].subtree_bounding_box, BoundingBox::ZERO);
}

// =========================================================================
// Small geometry cutoff
// =========================================================================

#[test]
fn test_small_geometries_dropped_next_to_large_ones() {
  let primitives = vec![
    prioritized_box(1, 0.0, PIPE),
    box_primitive(1, Vec3::new(0.5, 0.5, 0.5), 0.01)
      .with_discipline(PIPE)
      .with_priority(1),
  ];

  let sectors = split(primitives);

  assert_eq!(sectors[1].geometries.len(), 1);
  assert_eq!(sectors[1].geometries[0].bounding_box.extents(), Vec3::ONE);
}

#[test]
fn test_owner_with_only_small_geometries_is_kept() {
  let tiny = |x: f32| {
    box_primitive(1, Vec3::new(x, 0.0, 0.0), 0.01)
      .with_discipline(PIPE)
      .with_priority(1)
  };

  let sectors = split(vec![tiny(0.0), tiny(0.02)]);

  assert_eq!(sectors.len(), 2);
  assert_eq!(sectors[1].geometries.len(), 2);
}

#[test]
fn test_drop_small_geometries_boundary() {
  let at_cutoff = box_primitive(1, Vec3::ZERO, 0.1 / 3.0f32.sqrt());
  let large = box_primitive(1, Vec3::ZERO, 1.0);

  let kept = drop_small_geometries(vec![at_cutoff.clone(), large], 0.1 + 1e-6);
  assert_eq!(kept.len(), 1);

  let kept = drop_small_geometries(vec![at_cutoff], 0.1 + 1e-6);
  assert_eq!(kept.len(), 1);
}

#[test]
fn test_group_by_discipline_keeps_first_appearance_order() {
  let primitives = vec![
    prioritized_box(1, 0.0, CABLE),
    prioritized_box(2, 0.0, PIPE),
    prioritized_box(3, 0.0, CABLE),
    box_primitive(4, Vec3::ZERO, 1.0),
  ];

  let groups = group_by_discipline(primitives);

  let names: Vec<Option<&str>> = groups.iter().map(|(d, _)| d.as_deref()).collect();
  assert_eq!(names, vec![Some(CABLE), Some(PIPE), None]);
  assert_eq!(groups[0].1.len(), 2);
}
