use thiserror::Error;

use crate::block::Block;

/// Failures raised by [`BlockList`](crate::BlockList) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
  #[error("index {index} out of range for list of length {len}")]
  OutOfRange { index: usize, len: usize },

  #[error("invalid argument: {0}")]
  InvalidArgument(&'static str),

  #[error("block {0} not found in list")]
  NotFound(Block),
}

/// Failures raised by [`MemorySpace`](crate::MemorySpace) construction and
/// integrity checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
  #[error("memory space capacity must be positive")]
  ZeroCapacity,

  #[error("blocks {first} and {second} overlap")]
  Overlap { first: Block, second: Block },

  #[error("addresses [{start}, {end}) are not covered by any block")]
  Gap { start: usize, end: usize },

  #[error("block {0} has zero length")]
  ZeroLength(Block),

  #[error("block {0} extends past the end of the memory space")]
  OutOfBounds(Block),
}
