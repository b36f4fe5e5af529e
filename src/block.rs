use std::fmt;

/// A contiguous address range `[base_address, base_address + length)`.
///
/// Blocks are plain values: two blocks are equal when both fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
  pub base_address: usize,
  pub length: usize,
}

impl Block {
  pub fn new(
    base_address: usize,
    length: usize,
  ) -> Self {
    Self { base_address, length }
  }

  /// Exclusive end address.
  pub fn end(&self) -> usize {
    self.base_address + self.length
  }

  /// Whether `next` starts exactly where this block ends.
  pub fn is_followed_by(
    &self,
    next: &Block,
  ) -> bool {
    self.end() == next.base_address
  }

  pub fn overlaps(
    &self,
    other: &Block,
  ) -> bool {
    self.base_address < other.end() && other.base_address < self.end()
  }
}

impl fmt::Display for Block {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "({} , {})", self.base_address, self.length)
  }
}
