//! Sequential id generation for sectors.
//!
//! The generator is an explicit value threaded through the splitters. Two
//! trees get disjoint id spaces by seeding the second generator with the
//! first one's [`SequentialIdGenerator::peek`].

use crate::error::SplitError;

/// Ids are consumed as floats by the viewer, so they must stay exact in f32.
pub const MAX_ID: u64 = 1 << 24;

/// Issues strictly increasing ids starting at its seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequentialIdGenerator {
  next: u64,
}

impl SequentialIdGenerator {
  /// Create a generator whose first id is `seed`.
  pub fn new(seed: u32) -> Self {
    Self { next: seed as u64 }
  }

  /// Next id without consuming it.
  #[inline]
  pub fn peek(&self) -> u64 {
    self.next
  }

  /// Consume and return the next id.
  pub fn next_id(&mut self) -> Result<u32, SplitError> {
    if self.next >= MAX_ID {
      return Err(SplitError::IdSpaceExhausted { limit: MAX_ID });
    }
    let id = self.next as u32;
    self.next += 1;
    Ok(id)
  }
}

impl Default for SequentialIdGenerator {
  fn default() -> Self {
    Self::new(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_first_id_is_seed() {
    for seed in [0u32, 10] {
      let mut ids = SequentialIdGenerator::new(seed);
      assert_eq!(ids.next_id().unwrap(), seed);
      let peeked = ids.peek();
      let second = ids.next_id().unwrap();
      assert_eq!(second, seed + 1);
      assert_eq!(second as u64, peeked);
    }
  }

  #[test]
  fn test_ids_strictly_increase() {
    let mut ids = SequentialIdGenerator::default();
    let generated: Vec<u32> = (0..100).map(|_| ids.next_id().unwrap()).collect();
    assert!(generated.windows(2).all(|w| w[0] < w[1]));
  }

  #[test]
  fn test_exhausted_above_float_exact_range() {
    let mut ids = SequentialIdGenerator::new(1 << 24);
    assert!(matches!(
      ids.next_id(),
      Err(SplitError::IdSpaceExhausted { limit }) if limit == MAX_ID
    ));
  }

  #[test]
  fn test_last_valid_id() {
    let mut ids = SequentialIdGenerator::new((1 << 24) - 1);
    assert_eq!(ids.next_id().unwrap(), (1 << 24) - 1);
    assert!(ids.next_id().is_err());
  }
}
