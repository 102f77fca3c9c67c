use alloc::{
  boxed::Box,
  vec::Vec,
};
use core::cmp;

use getset::CopyGetters;
use tracing::{
  debug,
  trace,
};

use crate::{
  buffer::Buffer,
  class::{
    ClassError,
    SizeClass,
  },
  config::{
    ConfigError,
    PoolConfig,
  },
};

#[derive(Debug, PartialEq)]
pub enum PoolError {
  InvalidConfig(ConfigError),
  ClassError(ClassError),
}

pub type PoolResult<T> = Result<T, PoolError>;

/// Lock-free pool of fixed-size byte buffers.
///
/// Requests up to `max_size` are served from the smallest class that fits.
/// Anything the pool cannot serve comes from the heap instead, so `alloc`
/// never fails.
#[derive(Debug, CopyGetters)]
pub struct Pool {
  classes: Box<[SizeClass]>,
  #[getset(get_copy = "pub")]
  min_size: usize,
  #[getset(get_copy = "pub")]
  max_size: usize,
}

impl Pool {
  pub fn new(min_size: usize, max_size: usize, factor: usize, page_size: usize) -> PoolResult<Self> {
    Self::with_config(PoolConfig::new(min_size, max_size, factor, page_size))
  }

  pub fn with_config(config: PoolConfig) -> PoolResult<Self> {
    config.validate().map_err(PoolError::InvalidConfig)?;

    let classes = config
      .class_sizes()
      .map(|size| SizeClass::new(size, config.page_size()))
      .collect::<Result<Vec<_>, _>>()
      .map_err(PoolError::ClassError)?
      .into_boxed_slice();

    debug!(
      classes = classes.len(),
      min_size = config.min_size(),
      max_size = config.max_size(),
      page_size = config.page_size(),
      "pool ready"
    );

    Ok(Self {
      classes,
      min_size: config.min_size(),
      max_size: config.max_size(),
    })
  }

  pub fn classes(&self) -> &[SizeClass] {
    &self.classes
  }

  /// The class `alloc(size)` draws from, if any.
  pub fn class_for(&self, size: usize) -> Option<&SizeClass> {
    if size > self.max_size {
      return None;
    }

    let capacity = cmp::max(size, self.min_size);
    self.classes.iter().find(|class| class.size() >= capacity)
  }

  /// Returns a buffer of exactly `size` bytes.
  ///
  /// Only the first fitting class is tried. When it has no free chunk the
  /// buffer comes from the heap, even if a larger class has room.
  pub fn alloc(&self, size: usize) -> Buffer<'_> {
    let Some(class) = self.class_for(size) else {
      trace!(size, reason = "unclassed", "heap fallback");
      return Buffer::heap(size);
    };

    match class.pop() {
      // SAFETY: the chunk was just taken off the free list, so this buffer is
      // its only user until it is freed, and the page lives as long as `self`.
      Some(ptr) => unsafe { Buffer::chunk(ptr, size, class.size()) },
      None => {
        trace!(size, class = class.size(), reason = "exhausted", "heap fallback");
        Buffer::heap(size)
      }
    }
  }

  /// Gives a buffer back.
  ///
  /// The class is picked by exact capacity and then checked by address, so
  /// heap buffers and buffers from other pools are simply dropped.
  ///
  /// # Panics
  ///
  /// Panics if the buffer points into a class page but not at a chunk start,
  /// or if its chunk is already free.
  pub fn free(&self, buffer: Buffer<'_>) {
    let capacity = buffer.capacity();
    let Some(class) = self.classes.iter().find(|class| class.size() == capacity) else {
      trace!(capacity, "free ignored, no matching class");
      return;
    };

    if !class.push(buffer.as_ptr() as usize) {
      trace!(capacity, "free ignored, foreign address");
    }
  }
}
