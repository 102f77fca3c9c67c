use getset::CopyGetters;
use slabpool_list::{
  HasLink,
  Link,
};

/// One fixed-size slot of a class page.
///
/// The memory window is `offset..offset + size` of the owning page and never
/// changes.
#[derive(Debug, CopyGetters)]
pub struct Chunk {
  #[getset(get_copy = "pub")]
  offset: usize,
  link: Link,
}

impl Chunk {
  pub(crate) const fn new(offset: usize) -> Self {
    Self {
      offset,
      link: Link::new(),
    }
  }

  pub fn generation(&self) -> u32 {
    self.link.generation()
  }
}

impl HasLink for Chunk {
  fn link(&self) -> &Link {
    &self.link
  }
}
