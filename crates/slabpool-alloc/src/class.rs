use alloc::{
  boxed::Box,
  vec::Vec,
};
use core::ptr::NonNull;

use getset::CopyGetters;
use slabpool_extent::{
  Extent,
  ExtentError,
};
use slabpool_list::{
  FreeList,
  ListError,
};
use tracing::{
  debug,
  error,
};

use crate::chunk::Chunk;

#[derive(Debug, PartialEq)]
pub enum ClassError {
  ExtentError(ExtentError),
  ListError(ListError),
}

pub type ClassResult<T> = Result<T, ClassError>;

/// One page carved into same-size chunks with a lock-free free list.
#[derive(Debug, CopyGetters)]
pub struct SizeClass {
  #[getset(get_copy = "pub")]
  size: usize,
  page: Extent,
  #[getset(get_copy = "pub")]
  page_begin: usize,
  /// Base address of the last chunk.
  #[getset(get_copy = "pub")]
  page_end: usize,
  chunks: Box<[Chunk]>,
  free: FreeList,
}

impl SizeClass {
  pub fn new(size: usize, page_size: usize) -> ClassResult<Self> {
    let count = page_size / size;
    let page = Extent::new(page_size).map_err(ClassError::ExtentError)?;

    let chunks: Box<[Chunk]> = (0..count)
      .map(|i| Chunk::new(i * size))
      .collect::<Vec<_>>()
      .into_boxed_slice();
    let free = FreeList::chained(&chunks).map_err(ClassError::ListError)?;

    let page_begin = page.addr();
    let page_end = chunks.last().map_or(page_begin, |last| page_begin + last.offset());

    debug!(size, chunks = count, page_size, "size class ready");

    Ok(Self {
      size,
      page,
      page_begin,
      page_end,
      chunks,
      free,
    })
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  pub fn chunks(&self) -> &[Chunk] {
    &self.chunks
  }

  /// Whether `addr` lies in `[page_begin, page_end]`.
  pub fn owns(&self, addr: usize) -> bool {
    !self.chunks.is_empty() && self.page_begin <= addr && addr <= self.page_end
  }

  /// No chunk is free right now.
  pub fn is_empty(&self) -> bool {
    self.free.is_empty()
  }

  /// Number of chunks on the free list. Racy while other threads use the class.
  pub fn free_count(&self) -> usize {
    self.free.iter(&self.chunks).count()
  }

  pub(crate) fn pop(&self) -> Option<NonNull<u8>> {
    let index = self.free.pop(&self.chunks)?;
    let offset = self.chunks[index].offset();
    // SAFETY: chunk offsets are below `count * size <= page_size`.
    Some(unsafe { NonNull::new_unchecked(self.page.as_ptr().add(offset)) })
  }

  /// Puts the chunk starting at `addr` back on the free list.
  ///
  /// Returns `false` without touching anything when the address is outside
  /// this class's page.
  ///
  /// # Panics
  ///
  /// Panics if `addr` is inside the page but not the start of a chunk, or if
  /// the chunk is already free.
  pub(crate) fn push(&self, addr: usize) -> bool {
    if !self.owns(addr) {
      return false;
    }

    let offset = addr - self.page_begin;
    let index = offset / self.size;
    if self.chunks[index].offset() != offset {
      error!(size = self.size, addr, offset, "address is not a chunk base");
      panic!("slabpool: bad chunk");
    }

    self.free.push(&self.chunks, index);
    true
  }
}
