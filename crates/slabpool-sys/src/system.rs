#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::unix::UNIX_SYSTEM;

#[derive(Debug, PartialEq)]
pub enum SysError {
  Unsupported,
  OutOfMemory,
  InvalidArgument,
}

pub type SysResult<T> = Result<T, SysError>;

/// Source of page-granular memory for size class pages.
///
/// # Safety
///
/// Implementors must ensure that:
/// - `alloc` returns valid, page-aligned, zero-filled memory of exactly `size` bytes
/// - `dealloc` only operates on memory previously allocated by this system
/// - the returned memory stays at the same address until `dealloc`
pub unsafe trait System
where
  Self: Send + Sync,
{
  /// Maps `size` readable and writable bytes, backed on first touch.
  ///
  /// # Safety
  ///
  /// `size` must be page aligned and non-zero.
  unsafe fn alloc<'mem>(&self, size: usize) -> SysResult<&'mem mut [u8]> {
    _ = size;
    Err(SysError::Unsupported)
  }

  /// Unmaps memory returned from `alloc`.
  ///
  /// # Safety
  ///
  /// `slice` must have come from `alloc` on this system and must not be
  /// accessed afterwards.
  unsafe fn dealloc(&self, slice: &[u8]) -> SysResult<()> {
    _ = slice;
    Err(SysError::Unsupported)
  }
}

pub struct UnsupportedSystem {}
unsafe impl System for UnsupportedSystem {}

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub static GLOBAL_SYSTEM: &dyn System = &UNIX_SYSTEM;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub static GLOBAL_SYSTEM: &dyn System = &UnsupportedSystem {};
