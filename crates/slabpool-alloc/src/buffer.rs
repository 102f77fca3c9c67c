use alloc::{
  vec,
  vec::Vec,
};
use core::{
  fmt,
  marker::PhantomData,
  mem::ManuallyDrop,
  ops::{
    Deref,
    DerefMut,
  },
  ptr::NonNull,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backing {
  /// A window into a class page. Dropping it releases nothing.
  Chunk,
  /// A `Vec<u8>` allocation, released on drop.
  Heap,
}

/// Byte buffer handed out by [`Pool::alloc`](crate::Pool::alloc).
///
/// `len` is what the caller asked for; `capacity` is the whole chunk for
/// pooled buffers, which is how [`Pool::free`](crate::Pool::free) finds the
/// class again. The `'pool` lifetime keeps chunk memory from outliving the
/// pool's pages. A pooled buffer dropped without `free` is never recycled:
/// its chunk stays out of the pool until the pool itself is dropped.
pub struct Buffer<'pool> {
  ptr: NonNull<u8>,
  len: usize,
  capacity: usize,
  backing: Backing,
  _pool: PhantomData<&'pool [u8]>,
}

impl<'pool> Buffer<'pool> {
  /// Zeroed heap buffer of exactly `len` bytes.
  pub(crate) fn heap(len: usize) -> Self {
    Self::from(vec![0u8; len])
  }

  /// # Safety
  ///
  /// `ptr..ptr + capacity` must be a chunk that stays mapped for `'pool` and
  /// that nothing else reads or writes while this buffer lives.
  pub(crate) unsafe fn chunk(ptr: NonNull<u8>, len: usize, capacity: usize) -> Self {
    Self {
      ptr,
      len,
      capacity,
      backing: Backing::Chunk,
      _pool: PhantomData,
    }
  }

  /// Rebuilds a pool buffer from its raw parts.
  ///
  /// The result never releases memory on drop; hand it to
  /// [`Pool::free`](crate::Pool::free) to recycle the chunk.
  ///
  /// # Safety
  ///
  /// `ptr` must be valid for reads and writes of `capacity` bytes for `'pool`,
  /// `len <= capacity`, and no other live reference may access that memory
  /// through this buffer's lifetime.
  pub unsafe fn from_raw_parts(ptr: NonNull<u8>, len: usize, capacity: usize) -> Self {
    debug_assert!(len <= capacity);
    unsafe { Self::chunk(ptr, len, capacity) }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline]
  pub fn as_ptr(&self) -> *const u8 {
    self.ptr.as_ptr()
  }

  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  /// Whether the memory belongs to a pool page rather than the heap.
  pub fn is_pooled(&self) -> bool {
    self.backing == Backing::Chunk
  }
}

impl From<Vec<u8>> for Buffer<'_> {
  fn from(vec: Vec<u8>) -> Self {
    let mut vec = ManuallyDrop::new(vec);
    Self {
      // SAFETY: a Vec pointer is never null, dangling when capacity is 0.
      ptr: unsafe { NonNull::new_unchecked(vec.as_mut_ptr()) },
      len: vec.len(),
      capacity: vec.capacity(),
      backing: Backing::Heap,
      _pool: PhantomData,
    }
  }
}

impl Deref for Buffer<'_> {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
  }
}

impl DerefMut for Buffer<'_> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
  }
}

impl AsRef<[u8]> for Buffer<'_> {
  fn as_ref(&self) -> &[u8] {
    self
  }
}

impl AsMut<[u8]> for Buffer<'_> {
  fn as_mut(&mut self) -> &mut [u8] {
    self
  }
}

impl fmt::Debug for Buffer<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Buffer")
      .field("ptr", &self.ptr)
      .field("len", &self.len)
      .field("capacity", &self.capacity)
      .field("pooled", &self.is_pooled())
      .finish()
  }
}

impl Drop for Buffer<'_> {
  fn drop(&mut self) {
    if self.backing == Backing::Heap {
      drop(unsafe { Vec::from_raw_parts(self.ptr.as_ptr(), self.len, self.capacity) });
    }
  }
}

// SAFETY: a buffer is the only handle to its memory.
unsafe impl Send for Buffer<'_> {}
unsafe impl Sync for Buffer<'_> {}
