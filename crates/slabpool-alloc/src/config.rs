use getset::CopyGetters;
use slabpool_list::MAX_SLOTS;

pub const DEFAULT_MIN_SIZE: usize = 64;
pub const DEFAULT_MAX_SIZE: usize = 64 * 1024;
pub const DEFAULT_FACTOR: usize = 2;
pub const DEFAULT_PAGE_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
  ZeroMinSize,
  FactorTooSmall(usize),
  TooManyChunks(usize),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Size class layout of a [`Pool`](crate::Pool).
///
/// The first class is always `min_size`, even above `max_size`. Each later
/// class is the previous size times `factor`, and the sequence stops once the
/// next size would exceed `max_size`. Each class owns one page of `page_size`
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PoolConfig {
  min_size: usize,
  max_size: usize,
  factor: usize,
  page_size: usize,
}

impl PoolConfig {
  pub const fn new(min_size: usize, max_size: usize, factor: usize, page_size: usize) -> Self {
    Self {
      min_size,
      max_size,
      factor,
      page_size,
    }
  }

  pub const fn with_min_size(mut self, min_size: usize) -> Self {
    self.min_size = min_size;
    self
  }

  pub const fn with_max_size(mut self, max_size: usize) -> Self {
    self.max_size = max_size;
    self
  }

  pub const fn with_factor(mut self, factor: usize) -> Self {
    self.factor = factor;
    self
  }

  pub const fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size;
    self
  }

  pub fn validate(&self) -> ConfigResult<()> {
    if self.min_size == 0 {
      return Err(ConfigError::ZeroMinSize);
    }

    if self.factor < 2 {
      return Err(ConfigError::FactorTooSmall(self.factor));
    }

    let most = self.page_size / self.min_size;
    if most > MAX_SLOTS {
      return Err(ConfigError::TooManyChunks(most));
    }

    Ok(())
  }

  /// Chunk sizes in ascending order.
  ///
  /// The first class is always `min_size`, even when it exceeds `max_size`.
  pub fn class_sizes(&self) -> ClassSizes {
    ClassSizes {
      next: Some(self.min_size),
      max_size: self.max_size,
      factor: self.factor,
    }
  }
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self::new(
      DEFAULT_MIN_SIZE,
      DEFAULT_MAX_SIZE,
      DEFAULT_FACTOR,
      DEFAULT_PAGE_SIZE,
    )
  }
}

#[derive(Debug, Clone)]
pub struct ClassSizes {
  next: Option<usize>,
  max_size: usize,
  factor: usize,
}

impl Iterator for ClassSizes {
  type Item = usize;

  fn next(&mut self) -> Option<Self::Item> {
    let size = self.next?;
    self.next = size
      .checked_mul(self.factor)
      .filter(|&grown| grown <= self.max_size && grown > size);
    Some(size)
  }
}
