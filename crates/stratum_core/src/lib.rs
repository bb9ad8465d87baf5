//! # STRATUM Core Engine
//!
//! Building blocks shared by every generation layer:
//! - Scratch buffers recycled across repeated grid requests
//! - Deterministic seed mixing from world seed down to a single cell
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in hot path** - Buffers are pooled and reused
//! 2. **Pure seeding** - Cell state depends only on coordinates and seeds
//! 3. **Explicit sharing** - Pools are `&mut` by default, locked per call when shared
//!
//! ## Example
//!
//! ```rust
//! use stratum_core::{BufferPool, LayerSeed, WorldSeed};
//!
//! let mut pool: BufferPool<i32> = BufferPool::new();
//! let buffer = pool.acquire(16 * 16);
//! assert_eq!(buffer.len(), 256);
//! pool.release(buffer);
//!
//! let seed = LayerSeed::new(1000, WorldSeed::new(42));
//! let mut rng = seed.cell_rng(-3, 7);
//! assert!(rng.next_int(10) < 10);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;
pub mod seed;

pub use memory::{BufferPool, BufferSource, PoolStats, SharedBufferPool};
pub use seed::{seed_for, CellRng, LayerSeed, WorldSeed};
