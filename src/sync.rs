use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::space::MemorySpace;

/// A [`MemorySpace`] shared between threads.
///
/// Every operation holds one lock across both lists for its whole duration,
/// so no thread can see a block that has left one list but not yet reached
/// the other.
#[derive(Debug, Clone)]
pub struct SharedMemorySpace {
  inner: Arc<Mutex<MemorySpace>>,
}

impl SharedMemorySpace {
  pub fn new(space: MemorySpace) -> Self {
    Self {
      inner: Arc::new(Mutex::new(space)),
    }
  }

  // Operations finish their list edits before verifying, so a poisoned
  // space is still consistent.
  fn lock(&self) -> MutexGuard<'_, MemorySpace> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn allocate(
    &self,
    length: usize,
  ) -> Option<usize> {
    self.lock().allocate(length)
  }

  pub fn release(
    &self,
    address: usize,
  ) -> bool {
    self.lock().release(address)
  }

  pub fn defragment(&self) {
    self.lock().defragment();
  }

  /// Copy of the current state.
  pub fn snapshot(&self) -> MemorySpace {
    self.lock().clone()
  }

  /// Runs `f` with exclusive access, for callers composing several
  /// operations atomically.
  pub fn with<R>(
    &self,
    f: impl FnOnce(&mut MemorySpace) -> R,
  ) -> R {
    f(&mut self.lock())
  }
}

impl From<MemorySpace> for SharedMemorySpace {
  fn from(space: MemorySpace) -> Self {
    Self::new(space)
  }
}
