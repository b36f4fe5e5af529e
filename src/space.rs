use std::fmt;

use log::{debug, trace};

use crate::{
  block::Block,
  config::SpaceConfig,
  error::SpaceError,
  list::BlockList,
};

/// A simulated address space `[0, capacity)` split between an allocated list
/// and a free list.
///
/// Allocation is first-fit over the free list in its current order. Freed
/// blocks are appended to the free list as they are, and only
/// [`defragment`](MemorySpace::defragment) merges neighbours back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySpace {
  allocated: BlockList,
  free: BlockList,
  config: SpaceConfig,
}

impl MemorySpace {
  pub fn new(capacity: usize) -> Result<Self, SpaceError> {
    Self::with_config(SpaceConfig::new(capacity))
  }

  pub fn with_config(config: SpaceConfig) -> Result<Self, SpaceError> {
    if config.capacity == 0 {
      return Err(SpaceError::ZeroCapacity);
    }

    let mut free = BlockList::new();
    free.push_back(Block::new(0, config.capacity));

    debug!("created memory space of {} words", config.capacity);

    Ok(Self {
      allocated: BlockList::new(),
      free,
      config,
    })
  }

  pub fn capacity(&self) -> usize {
    self.config.capacity
  }

  pub fn config(&self) -> &SpaceConfig {
    &self.config
  }

  pub fn allocated(&self) -> &BlockList {
    &self.allocated
  }

  pub fn free(&self) -> &BlockList {
    &self.free
  }

  pub fn allocated_total(&self) -> usize {
    self.allocated.iter().map(|block| block.length).sum()
  }

  pub fn free_total(&self) -> usize {
    self.free.iter().map(|block| block.length).sum()
  }

  pub fn largest_free(&self) -> Option<usize> {
    self.free.iter().map(|block| block.length).max()
  }

  fn find_free_block(
    &self,
    length: usize,
  ) -> Option<usize> {
    self.free.iter().position(|block| block.length >= length)
  }

  /// Allocates `length` words and returns the base address of the new block.
  ///
  /// Returns `None` when `length` is zero or no free block is large enough.
  /// A failed request leaves both lists untouched unless the space was
  /// configured to defragment on failure.
  pub fn allocate(
    &mut self,
    length: usize,
  ) -> Option<usize> {
    if length == 0 {
      debug!("rejected zero-length allocation");
      return None;
    }

    let index = match self.find_free_block(length) {
      Some(index) => index,
      None if self.config.defragment_on_failure => {
        trace!("no free block of {length} words, defragmenting and rescanning");
        self.defragment();
        self.find_free_block(length)?
      }
      None => {
        debug!(
          "cannot allocate {length} words, largest free block is {:?}",
          self.largest_free()
        );
        return None;
      }
    };

    let free_block = self.free.get_mut(index).ok()?;
    let base_address = free_block.base_address;

    if free_block.length == length {
      trace!("free block at {base_address} consumed whole");
      self.free.remove_at(index).ok()?;
    } else {
      free_block.base_address += length;
      free_block.length -= length;
      trace!("free block at {base_address} split, remainder {free_block}");
    }

    self.allocated.push_back(Block::new(base_address, length));
    debug!("allocated {length} words at {base_address}");

    self.debug_verify();
    Some(base_address)
  }

  /// Moves the allocated block starting at `address` to the end of the free
  /// list. Unknown addresses are ignored.
  ///
  /// Returns whether a block was released.
  pub fn release(
    &mut self,
    address: usize,
  ) -> bool {
    let handle = self
      .allocated
      .handles()
      .find(|(_, block)| block.base_address == address)
      .map(|(handle, _)| handle);

    let Some(block) = handle.and_then(|handle| self.allocated.remove_handle(handle)) else {
      debug!("release of {address} ignored, no block allocated there");
      return false;
    };

    debug!("released {block}");
    self.free.push_back(block);

    self.debug_verify();
    true
  }

  /// Rebuilds the free list as address-sorted maximal runs of adjacent
  /// blocks. The allocated list is left alone.
  pub fn defragment(&mut self) {
    if self.free.len() <= 1 {
      return;
    }

    let mut blocks: Vec<Block> = self.free.iter().copied().collect();
    blocks.sort_by_key(|block| block.base_address);

    let before = blocks.len();
    let mut blocks = blocks.into_iter();
    let Some(mut run) = blocks.next() else {
      return;
    };

    let mut merged = BlockList::new();
    for next in blocks {
      if run.is_followed_by(&next) {
        run.length += next.length;
      } else {
        merged.push_back(run);
        run = next;
      }
    }
    merged.push_back(run);

    debug!("defragmented free list from {before} to {} blocks", merged.len());
    self.free = merged;

    self.debug_verify();
  }

  /// Checks that the two lists tile `[0, capacity)` exactly.
  pub fn verify(&self) -> Result<(), SpaceError> {
    let mut blocks: Vec<Block> = self.allocated.iter().chain(self.free.iter()).copied().collect();
    blocks.sort_by_key(|block| block.base_address);

    let capacity = self.capacity();
    let mut cursor = 0;
    let mut previous: Option<Block> = None;

    for block in blocks {
      if block.length == 0 {
        return Err(SpaceError::ZeroLength(block));
      }
      if block.end() > capacity {
        return Err(SpaceError::OutOfBounds(block));
      }
      match previous {
        Some(prev) if prev.overlaps(&block) => {
          return Err(SpaceError::Overlap {
            first: prev,
            second: block,
          });
        }
        _ => {}
      }
      if block.base_address > cursor {
        return Err(SpaceError::Gap {
          start: cursor,
          end: block.base_address,
        });
      }

      cursor = block.end();
      previous = Some(block);
    }

    if cursor < capacity {
      return Err(SpaceError::Gap {
        start: cursor,
        end: capacity,
      });
    }

    Ok(())
  }

  fn debug_verify(&self) {
    if cfg!(debug_assertions) {
      if let Err(err) = self.verify() {
        panic!("memory space invariant broken: {err}\n{self}");
      }
    }
  }
}

impl fmt::Display for MemorySpace {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{}\n{}", self.free, self.allocated)
  }
}
