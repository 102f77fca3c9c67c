#![cfg_attr(not(test), no_std)]

pub use slabpool_alloc::{
  Buffer,
  Pool,
  PoolConfig,
  PoolError,
  PoolResult,
  SizeClass,
  config,
};
use spin::Once;

pub mod prelude {
  pub use slabpool_alloc::{
    Buffer,
    Pool,
    PoolConfig,
    PoolError,
    PoolResult,
  };
  pub use slabpool_sys::prim::page_size;

  pub use super::shared;
}

static SHARED: Once<Pool> = Once::new();

/// Process-wide pool built from [`PoolConfig::default`] on first use.
///
/// A failed build is not cached; the next call tries again.
pub fn shared() -> PoolResult<&'static Pool> {
  SHARED.try_call_once(|| Pool::with_config(PoolConfig::default()))
}
