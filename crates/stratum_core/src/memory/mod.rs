//! # Memory Management
//!
//! Reusable scratch buffers for grid generation.
//!
//! ## Design Philosophy
//!
//! Layer queries arrive at chunk granularity, over and over, during world
//! exploration. Every request needs width x height output cells:
//! - Buffers are handed out by size and returned after use
//! - A returned buffer is zero-filled again before it is handed out
//! - Pools are single-owner; `SharedBufferPool` locks once per acquire or release
//! - Producers take `&mut dyn BufferSource`, so either kind can be passed

mod pool;

pub use pool::{BufferPool, BufferSource, PoolStats, SharedBufferPool};
