use std::{
  collections::{VecDeque, vec_deque},
  fmt,
  iter::FusedIterator,
  sync::atomic::{AtomicU64, Ordering},
};

use crate::{block::Block, error::ListError};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one element of a [`BlockList`].
///
/// Handles are minted on insertion and are unique for the life of the
/// process, so a stale handle can never name a different element. Clones of
/// a list keep the handles of their source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHandle(u64);

impl BlockHandle {
  fn mint() -> Self {
    Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
  }
}

#[derive(Debug, Clone)]
struct Entry {
  handle: BlockHandle,
  block: Block,
}

/// An ordered sequence of [`Block`]s.
///
/// The list never reorders its elements: position is whatever the caller
/// chose at insertion. Read and removal accessors take indices in
/// `0..len()`, insertion takes indices in `0..=len()`.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
  entries: VecDeque<Entry>,
}

impl BlockList {
  pub fn new() -> Self {
    Self {
      entries: VecDeque::new(),
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn check_index(
    &self,
    index: usize,
  ) -> Result<(), ListError> {
    if index >= self.entries.len() {
      return Err(ListError::OutOfRange {
        index,
        len: self.entries.len(),
      });
    }
    Ok(())
  }

  pub fn get(
    &self,
    index: usize,
  ) -> Result<&Block, ListError> {
    self.check_index(index)?;
    Ok(&self.entries[index].block)
  }

  pub fn get_mut(
    &mut self,
    index: usize,
  ) -> Result<&mut Block, ListError> {
    self.check_index(index)?;
    Ok(&mut self.entries[index].block)
  }

  pub fn handle_at(
    &self,
    index: usize,
  ) -> Result<BlockHandle, ListError> {
    self.check_index(index)?;
    Ok(self.entries[index].handle)
  }

  pub fn get_by_handle(
    &self,
    handle: BlockHandle,
  ) -> Option<&Block> {
    self.position_of_handle(handle).map(|index| &self.entries[index].block)
  }

  fn position_of_handle(
    &self,
    handle: BlockHandle,
  ) -> Option<usize> {
    self.entries.iter().position(|entry| entry.handle == handle)
  }

  pub fn first(&self) -> Option<&Block> {
    self.entries.front().map(|entry| &entry.block)
  }

  pub fn last(&self) -> Option<&Block> {
    self.entries.back().map(|entry| &entry.block)
  }

  /// Inserts `block` so that it ends up at `index`.
  ///
  /// Constant time at either end of the list, linear in between.
  pub fn insert_at(
    &mut self,
    index: usize,
    block: Block,
  ) -> Result<BlockHandle, ListError> {
    let len = self.entries.len();
    if index > len {
      return Err(ListError::OutOfRange { index, len });
    }

    if index == 0 {
      return Ok(self.push_front(block));
    }
    if index == len {
      return Ok(self.push_back(block));
    }

    let handle = BlockHandle::mint();
    self.entries.insert(index, Entry { handle, block });
    Ok(handle)
  }

  pub fn push_back(
    &mut self,
    block: Block,
  ) -> BlockHandle {
    let handle = BlockHandle::mint();
    self.entries.push_back(Entry { handle, block });
    handle
  }

  pub fn push_front(
    &mut self,
    block: Block,
  ) -> BlockHandle {
    let handle = BlockHandle::mint();
    self.entries.push_front(Entry { handle, block });
    handle
  }

  /// Position of the first element equal in value to `block`.
  pub fn index_of(
    &self,
    block: &Block,
  ) -> Option<usize> {
    self.entries.iter().position(|entry| entry.block == *block)
  }

  pub fn remove_at(
    &mut self,
    index: usize,
  ) -> Result<Block, ListError> {
    self.check_index(index)?;
    self
      .entries
      .remove(index)
      .map(|entry| entry.block)
      .ok_or(ListError::OutOfRange {
        index,
        len: self.entries.len(),
      })
  }

  /// Removes the exact element `handle` names. Absent handles are ignored.
  pub fn remove_handle(
    &mut self,
    handle: BlockHandle,
  ) -> Option<Block> {
    let index = self.position_of_handle(handle)?;
    self.entries.remove(index).map(|entry| entry.block)
  }

  /// Removes the first element equal in value to `block`.
  pub fn remove_value(
    &mut self,
    block: &Block,
  ) -> Result<Block, ListError> {
    if self.entries.is_empty() {
      return Err(ListError::InvalidArgument("cannot remove from an empty list"));
    }

    let index = self.index_of(block).ok_or(ListError::NotFound(*block))?;
    self.remove_at(index)
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn iter(&self) -> Iter<'_> {
    Iter {
      inner: self.entries.iter(),
    }
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Block> {
    self.entries.iter_mut().map(|entry| &mut entry.block)
  }

  pub fn handles(&self) -> impl Iterator<Item = (BlockHandle, &Block)> {
    self.entries.iter().map(|entry| (entry.handle, &entry.block))
  }
}

/// Lists compare by block values in order; handles are ignored.
impl PartialEq for BlockList {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.len() == other.len() && self.iter().eq(other.iter())
  }
}

impl Eq for BlockList {}

impl FromIterator<Block> for BlockList {
  fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
    let mut list = BlockList::new();
    list.extend(iter);
    list
  }
}

impl Extend<Block> for BlockList {
  fn extend<I: IntoIterator<Item = Block>>(
    &mut self,
    iter: I,
  ) {
    for block in iter {
      self.push_back(block);
    }
  }
}

impl<'a> IntoIterator for &'a BlockList {
  type Item = &'a Block;
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl fmt::Display for BlockList {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    for (i, block) in self.iter().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      write!(f, "{block}")?;
    }
    Ok(())
  }
}

/// Front-to-back iterator over the blocks of a [`BlockList`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
  inner: vec_deque::Iter<'a, Entry>,
}

impl<'a> Iterator for Iter<'a> {
  type Item = &'a Block;

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next().map(|entry| &entry.block)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

impl DoubleEndedIterator for Iter<'_> {
  fn next_back(&mut self) -> Option<Self::Item> {
    self.inner.next_back().map(|entry| &entry.block)
  }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
  use super::*;

  fn list_of(blocks: &[(usize, usize)]) -> BlockList {
    blocks.iter().map(|&(base, len)| Block::new(base, len)).collect()
  }

  fn values(list: &BlockList) -> Vec<(usize, usize)> {
    list.iter().map(|b| (b.base_address, b.length)).collect()
  }

  #[test]
  fn test_push_both_ends() {
    let mut list = BlockList::new();
    assert!(list.is_empty());

    list.push_back(Block::new(10, 1));
    list.push_front(Block::new(0, 1));
    list.push_back(Block::new(20, 1));

    assert_eq!(list.len(), 3);
    assert_eq!(values(&list), vec![(0, 1), (10, 1), (20, 1)]);
    assert_eq!(list.first(), Some(&Block::new(0, 1)));
    assert_eq!(list.last(), Some(&Block::new(20, 1)));
  }

  #[test]
  fn test_insert_at_bounds() {
    let mut list = BlockList::new();

    list.insert_at(0, Block::new(5, 1)).unwrap();
    list.insert_at(1, Block::new(9, 1)).unwrap();
    list.insert_at(1, Block::new(7, 1)).unwrap();
    list.insert_at(0, Block::new(1, 1)).unwrap();

    assert_eq!(values(&list), vec![(1, 1), (5, 1), (7, 1), (9, 1)]);

    assert_eq!(
      list.insert_at(5, Block::new(0, 1)),
      Err(ListError::OutOfRange { index: 5, len: 4 })
    );
    assert_eq!(list.len(), 4);
  }

  #[test]
  fn test_get_requires_index_below_len() {
    let mut list = list_of(&[(0, 4), (4, 4)]);

    assert_eq!(list.get(1), Ok(&Block::new(4, 4)));
    assert_eq!(list.get(2), Err(ListError::OutOfRange { index: 2, len: 2 }));
    assert!(list.handle_at(2).is_err());

    list.get_mut(0).unwrap().length = 3;
    assert_eq!(list.get(0), Ok(&Block::new(0, 3)));

    assert!(BlockList::new().get(0).is_err());
  }

  #[test]
  fn test_index_of_uses_value_equality() {
    let list = list_of(&[(0, 4), (4, 4), (0, 4)]);

    assert_eq!(list.index_of(&Block::new(0, 4)), Some(0));
    assert_eq!(list.index_of(&Block::new(4, 4)), Some(1));
    assert_eq!(list.index_of(&Block::new(4, 5)), None);
  }

  #[test]
  fn test_remove_at() {
    let mut list = list_of(&[(0, 1), (1, 1), (2, 1)]);

    assert_eq!(list.remove_at(2), Ok(Block::new(2, 1)));
    assert_eq!(list.remove_at(0), Ok(Block::new(0, 1)));
    assert_eq!(list.remove_at(1), Err(ListError::OutOfRange { index: 1, len: 1 }));
    assert_eq!(values(&list), vec![(1, 1)]);
    assert_eq!(list.last(), Some(&Block::new(1, 1)));
  }

  #[test]
  fn test_remove_handle_targets_identity() {
    let mut list = BlockList::new();
    let first = list.push_back(Block::new(0, 8));
    let twin = list.push_back(Block::new(0, 8));

    assert_eq!(list.remove_handle(twin), Some(Block::new(0, 8)));
    assert_eq!(list.len(), 1);
    assert_eq!(list.handle_at(0), Ok(first));

    // Already removed: no-op.
    assert_eq!(list.remove_handle(twin), None);
    assert_eq!(list.len(), 1);

    list.clear();
    assert_eq!(list.remove_handle(first), None);
  }

  #[test]
  fn test_handles_are_not_shared_between_lists() {
    let mut a = BlockList::new();
    let mut b = BlockList::new();
    let ha = a.push_back(Block::new(0, 1));
    let hb = b.push_back(Block::new(0, 1));

    assert_ne!(ha, hb);
    assert_eq!(b.remove_handle(ha), None);
    assert_eq!(a.get_by_handle(ha), Some(&Block::new(0, 1)));
    assert_eq!(a.get_by_handle(hb), None);
  }

  #[test]
  fn test_remove_value() {
    let mut list = list_of(&[(0, 2), (2, 2), (0, 2)]);

    assert_eq!(list.remove_value(&Block::new(0, 2)), Ok(Block::new(0, 2)));
    assert_eq!(values(&list), vec![(2, 2), (0, 2)]);

    assert_eq!(
      list.remove_value(&Block::new(9, 9)),
      Err(ListError::NotFound(Block::new(9, 9)))
    );

    list.clear();
    assert!(matches!(
      list.remove_value(&Block::new(2, 2)),
      Err(ListError::InvalidArgument(_))
    ));
  }

  #[test]
  fn test_iter_restarts_from_front() {
    let list = list_of(&[(0, 1), (5, 2)]);

    let mut it = list.iter();
    assert_eq!(it.len(), 2);
    assert_eq!(it.next(), Some(&Block::new(0, 1)));

    let again: Vec<_> = list.iter().copied().collect();
    assert_eq!(again, vec![Block::new(0, 1), Block::new(5, 2)]);
    assert_eq!((&list).into_iter().rev().next(), Some(&Block::new(5, 2)));
  }

  #[test]
  fn test_iter_mut_edits_in_place() {
    let mut list = list_of(&[(0, 1), (5, 2)]);
    for block in list.iter_mut() {
      block.length += 1;
    }
    assert_eq!(values(&list), vec![(0, 2), (5, 3)]);
  }

  #[test]
  fn test_equality_ignores_handles() {
    let a = list_of(&[(0, 1), (1, 1)]);
    let b = list_of(&[(0, 1), (1, 1)]);
    let c = list_of(&[(1, 1), (0, 1)]);

    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn test_display() {
    assert_eq!(BlockList::new().to_string(), "");
    assert_eq!(list_of(&[(0, 20), (60, 40)]).to_string(), "(0 , 20) (60 , 40)");
  }
}
