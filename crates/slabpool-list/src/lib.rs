//! Lock-free LIFO free list over a fixed array of slots.
//!
//! The list never stores pointers. The head is one `u64` packing the 1-based
//! index of the top slot with that slot's generation at the time it was
//! pushed. Every push bumps the slot's generation, so a slot that is popped
//! and pushed back produces a different head word and a stale
//! compare-and-swap from another thread fails instead of splicing in an
//! outdated `next`.
#![cfg_attr(not(test), no_std)]

use core::{
  sync::atomic::{
    AtomicU32,
    AtomicU64,
    Ordering,
  },
};

use tracing::error;

const INDEX_SHIFT: u32 = 32;

/// Largest number of slots a single list can address.
pub const MAX_SLOTS: usize = (u32::MAX - 1) as usize;

#[derive(Debug, PartialEq, Eq)]
pub enum ListError {
  TooManySlots(usize),
}

pub type ListResult<T> = Result<T, ListError>;

/// Packed `(index + 1) << 32 | generation`. Zero is the empty sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tagged(u64);

impl Tagged {
  pub const EMPTY: Tagged = Tagged(0);

  pub const fn new(slot: usize, generation: u32) -> Self {
    Self(((slot as u64 + 1) << INDEX_SHIFT) | generation as u64)
  }

  pub const fn raw(self) -> u64 {
    self.0
  }

  pub const fn is_empty(self) -> bool {
    self.0 >> INDEX_SHIFT == 0
  }

  pub const fn slot(self) -> Option<usize> {
    match self.0 >> INDEX_SHIFT {
      0 => None,
      index => Some(index as usize - 1),
    }
  }

  pub const fn generation(self) -> u32 {
    self.0 as u32
  }
}

/// Per-slot free list metadata.
#[derive(Debug, Default)]
pub struct Link {
  next: AtomicU64,
  generation: AtomicU32,
}

impl Link {
  pub const fn new() -> Self {
    Self {
      next: AtomicU64::new(0),
      generation: AtomicU32::new(0),
    }
  }

  pub fn next(&self) -> Tagged {
    Tagged(self.next.load(Ordering::Relaxed))
  }

  pub fn generation(&self) -> u32 {
    self.generation.load(Ordering::Relaxed)
  }

  /// Whether the slot currently points at a successor.
  ///
  /// The tail of the list also reads as unlinked.
  pub fn is_linked(&self) -> bool {
    self.next.load(Ordering::Relaxed) != 0
  }

  fn set_next(&self, next: Tagged) {
    self.next.store(next.0, Ordering::Relaxed);
  }

  fn bump(&self) -> u32 {
    self.generation.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
  }
}

pub trait HasLink {
  fn link(&self) -> &Link;
}

impl HasLink for Link {
  fn link(&self) -> &Link {
    self
  }
}

/// Head of a lock-free stack of slot indices.
///
/// The slot array is passed to every operation and must be the same array
/// for the whole life of the list.
#[derive(Debug)]
pub struct FreeList {
  head: AtomicU64,
}

impl FreeList {
  pub const fn new() -> Self {
    Self {
      head: AtomicU64::new(0),
    }
  }

  /// Links every slot in index order, slot 0 on top.
  pub fn chained<T>(slots: &[T]) -> ListResult<Self>
  where
    T: HasLink,
  {
    if slots.len() > MAX_SLOTS {
      return Err(ListError::TooManySlots(slots.len()));
    }

    let count = slots.len();
    for (i, slot) in slots.iter().enumerate() {
      let next = if i + 1 < count {
        Tagged::new(i + 1, 0)
      } else {
        Tagged::EMPTY
      };
      slot.link().set_next(next);
    }

    let head = if count == 0 {
      Tagged::EMPTY
    } else {
      Tagged::new(0, 0)
    };

    Ok(Self {
      head: AtomicU64::new(head.0),
    })
  }

  pub fn head(&self) -> Tagged {
    Tagged(self.head.load(Ordering::Acquire))
  }

  pub fn is_empty(&self) -> bool {
    self.head().is_empty()
  }

  /// Returns `slot` to the list.
  ///
  /// # Panics
  ///
  /// Panics if the slot still has a successor, meaning it is already free.
  /// The check is best effort: the tail slot and racing frees of the same
  /// slot are not caught.
  pub fn push<T>(&self, slots: &[T], slot: usize)
  where
    T: HasLink,
  {
    let link = slots[slot].link();
    if link.is_linked() {
      error!(slot, next = link.next().raw(), "slot pushed while already free");
      panic!("slabpool: double free");
    }

    let generation = link.bump();
    let new = Tagged::new(slot, generation);

    let mut old = self.head.load(Ordering::Relaxed);
    loop {
      link.set_next(Tagged(old));
      match self
        .head
        .compare_exchange_weak(old, new.0, Ordering::Release, Ordering::Relaxed)
      {
        Ok(_) => return,
        Err(actual) => old = actual,
      }
    }
  }

  /// Takes the top slot, or `None` if the list is empty.
  pub fn pop<T>(&self, slots: &[T]) -> Option<usize>
  where
    T: HasLink,
  {
    let mut old = self.head.load(Ordering::Acquire);
    loop {
      let slot = Tagged(old).slot()?;
      let Some(entry) = slots.get(slot) else {
        error!(slot, len = slots.len(), "free list head out of range");
        panic!("slabpool: corrupted free list");
      };

      let link = entry.link();
      let next = link.next.load(Ordering::Relaxed);
      match self
        .head
        .compare_exchange_weak(old, next, Ordering::AcqRel, Ordering::Acquire)
      {
        Ok(_) => {
          link.set_next(Tagged::EMPTY);
          return Some(slot);
        }
        Err(actual) => old = actual,
      }
    }
  }

  /// Walks the list from the head.
  ///
  /// Only meaningful while no other thread is pushing or popping.
  pub fn iter<'list, T>(&'list self, slots: &'list [T]) -> ListIter<'list, T>
  where
    T: HasLink,
  {
    ListIter::new(self.head(), slots)
  }
}

impl Default for FreeList {
  fn default() -> Self {
    Self::new()
  }
}

pub struct ListIter<'list, T>
where
  T: HasLink + 'list,
{
  next: Tagged,
  slots: &'list [T],
  remaining: usize,
}

impl<'list, T> ListIter<'list, T>
where
  T: HasLink + 'list,
{
  fn new(start: Tagged, slots: &'list [T]) -> Self {
    Self {
      next: start,
      slots,
      remaining: slots.len(),
    }
  }
}

impl<'list, T> Iterator for ListIter<'list, T>
where
  T: HasLink + 'list,
{
  type Item = usize;

  fn next(&mut self) -> Option<Self::Item> {
    if self.remaining == 0 {
      return None;
    }

    let slot = self.next.slot()?;
    self.next = self.slots.get(slot)?.link().next();
    self.remaining -= 1;
    Some(slot)
  }
}

#[cfg(test)]
mod tests;
