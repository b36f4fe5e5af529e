/// Construction parameters for a [`MemorySpace`](crate::MemorySpace).
///
/// ```rust
/// use memspace::{MemorySpace, SpaceConfig};
///
/// let config = SpaceConfig::new(64).defragment_on_failure(true);
/// let space = MemorySpace::with_config(config).unwrap();
///
/// assert_eq!(space.capacity(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceConfig {
  pub capacity: usize,
  /// Run one defragmentation pass and rescan when first-fit finds nothing.
  /// Off by default: callers normally decide when to defragment.
  pub defragment_on_failure: bool,
}

impl SpaceConfig {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      defragment_on_failure: false,
    }
  }

  pub fn defragment_on_failure(
    mut self,
    enabled: bool,
  ) -> Self {
    self.defragment_on_failure = enabled;
    self
  }
}
