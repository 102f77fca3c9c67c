#![cfg_attr(not(test), no_std)]

pub mod math;
pub mod prim;
pub mod system;
pub mod unix;

pub use system::GLOBAL_SYSTEM;

pub mod prelude {
  pub use super::{
    GLOBAL_SYSTEM,
    math::{
      align_up,
      is_aligned,
    },
    prim::{
      PrimError,
      PrimResult,
      is_page_aligned,
      page_align,
      page_size,
    },
    system::{
      SysError,
      SysResult,
      System,
    },
  };
}
