#![cfg_attr(not(test), no_std)]

use core::{
  fmt,
  ptr::NonNull,
};

use slabpool_sys::{
  GLOBAL_SYSTEM,
  prim::{
    PrimError,
    page_align,
  },
  system::SysError,
};

#[derive(Debug, PartialEq)]
pub enum ExtentError {
  SystemError(SysError),
  PrimError(PrimError),
}

pub type ExtentResult<T> = Result<T, ExtentError>;

/// A page-aligned mapping that stays at one address until dropped.
///
/// `len` is the size that was asked for; the mapping itself is rounded up to
/// whole OS pages.
pub struct Extent {
  ptr: NonNull<u8>,
  len: usize,
  mapped: usize,
}

impl Extent {
  pub fn new(size: usize) -> ExtentResult<Extent> {
    if size == 0 {
      return Ok(Extent {
        ptr: NonNull::dangling(),
        len: 0,
        mapped: 0,
      });
    }

    let mapped = page_align(size).map_err(ExtentError::PrimError)?;
    let slice = unsafe { GLOBAL_SYSTEM.alloc(mapped) }.map_err(ExtentError::SystemError)?;

    Ok(Extent {
      ptr: unsafe { NonNull::new_unchecked(slice.as_mut_ptr()) },
      len: size,
      mapped,
    })
  }

  #[inline(always)]
  pub fn as_ptr(&self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  #[inline(always)]
  pub fn addr(&self) -> usize {
    self.ptr.as_ptr() as usize
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn mapped(&self) -> usize {
    self.mapped
  }
}

impl AsRef<[u8]> for Extent {
  fn as_ref(&self) -> &[u8] {
    unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
  }
}

impl AsMut<[u8]> for Extent {
  fn as_mut(&mut self) -> &mut [u8] {
    unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
  }
}

impl fmt::Debug for Extent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Extent")
      .field("addr", &self.ptr)
      .field("len", &self.len)
      .field("mapped", &self.mapped)
      .finish()
  }
}

impl Drop for Extent {
  fn drop(&mut self) {
    if self.mapped == 0 {
      return;
    }

    let whole = unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.mapped) };
    let _ = unsafe { GLOBAL_SYSTEM.dealloc(whole) };
  }
}

// SAFETY: the mapping is uniquely owned; shared access only hands out the
// base address, writers go through raw pointers the owner hands out.
unsafe impl Send for Extent {}
unsafe impl Sync for Extent {}

#[cfg(test)]
mod tests;
