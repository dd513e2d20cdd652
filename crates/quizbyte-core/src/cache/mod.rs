//! The Cache Port: an abstract key-value store with TTL.
//!
//! [`CachePort`] is the single capability interface the rest of the crate
//! depends on: a shared mutable cache reachable from many call sites is
//! expressed as a capability interface injected into constructors, never a
//! process-global. [`RedisCachePort`] is the production implementation;
//! [`InMemoryCachePort`] backs tests.

pub mod error;
pub mod keys;
pub mod memory;
pub mod port;
pub mod redis;

pub use error::CacheError;
pub use memory::InMemoryCachePort;
pub use port::{CachePort, CachePortExt};
pub use redis::RedisCachePort;
