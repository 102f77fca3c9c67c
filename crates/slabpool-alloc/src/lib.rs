#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod buffer;
pub mod chunk;
pub mod class;
pub mod config;
pub mod pool;

pub use buffer::Buffer;
pub use class::SizeClass;
pub use config::PoolConfig;
pub use pool::{
  Pool,
  PoolError,
  PoolResult,
};
