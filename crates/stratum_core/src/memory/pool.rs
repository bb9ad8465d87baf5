//! # Buffer Pool
//!
//! Size-keyed allocator for scratch buffers that are requested repeatedly.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Default number of idle buffers kept per distinct size.
const DEFAULT_MAX_PER_SIZE: usize = 8;

/// Lends and takes back scratch buffers.
///
/// Grid producers only see this trait, so the same code runs against a
/// private [`BufferPool`] or against a [`SharedBufferPool`] that is locked
/// once per call.
pub trait BufferSource<T> {
    /// Returns a buffer of exactly `size` default-valued elements.
    fn acquire(&mut self, size: usize) -> Vec<T>;

    /// Hands a buffer back for later reuse.
    fn release(&mut self, buffer: Vec<T>);
}

/// Counters describing how well a pool is being reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Requests served from an idle buffer.
    pub hits: u64,
    /// Requests that had to allocate.
    pub misses: u64,
    /// Buffers returned to the pool.
    pub released: u64,
    /// Buffers dropped on release because their bucket was full.
    pub discarded: u64,
}

/// A pool of reusable `Vec<T>` buffers keyed by length.
///
/// Every buffer handed out by [`acquire`](Self::acquire) has exactly the
/// requested length and every element is `T::default()`, whether it is fresh
/// or recycled. Stale data from a previous request can never be observed.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per worker thread or wrap it in
/// a [`SharedBufferPool`].
///
/// # Example
///
/// ```rust
/// use stratum_core::BufferPool;
///
/// let mut pool: BufferPool<u16> = BufferPool::new();
///
/// let mut a = pool.acquire(4);
/// a[0] = 7;
/// pool.release(a);
///
/// // Same allocation, zeroed again
/// let b = pool.acquire(4);
/// assert_eq!(b, vec![0; 4]);
/// assert_eq!(pool.stats().hits, 1);
/// ```
pub struct BufferPool<T> {
    /// Idle buffers, bucketed by length.
    buckets: HashMap<usize, Vec<Vec<T>>>,
    /// Maximum idle buffers kept per bucket.
    max_per_size: usize,
    /// Reuse counters.
    stats: PoolStats,
}

impl<T: Copy + Default> BufferPool<T> {
    /// Creates an empty pool with the default bucket limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_per_size(DEFAULT_MAX_PER_SIZE)
    }

    /// Creates an empty pool keeping at most `max_per_size` idle buffers of
    /// any one length.
    #[must_use]
    pub fn with_max_per_size(max_per_size: usize) -> Self {
        Self {
            buckets: HashMap::new(),
            max_per_size,
            stats: PoolStats::default(),
        }
    }

    /// Returns a buffer of exactly `size` default-valued elements.
    ///
    /// Reuses an idle buffer of the same length when one exists, otherwise
    /// allocates.
    pub fn acquire(&mut self, size: usize) -> Vec<T> {
        if let Some(mut buffer) = self.buckets.get_mut(&size).and_then(Vec::pop) {
            self.stats.hits += 1;
            buffer.fill(T::default());
            return buffer;
        }

        self.stats.misses += 1;
        vec![T::default(); size]
    }

    /// Returns a buffer to the pool for later reuse.
    ///
    /// The buffer is filed under its current length. Empty buffers and
    /// buffers arriving at a full bucket are dropped.
    pub fn release(&mut self, buffer: Vec<T>) {
        let size = buffer.len();
        if size == 0 {
            return;
        }

        let bucket = self.buckets.entry(size).or_default();
        if bucket.len() >= self.max_per_size {
            self.stats.discarded += 1;
            return;
        }

        bucket.push(buffer);
        self.stats.released += 1;
    }

    /// Number of idle buffers currently held, across all sizes.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Number of idle buffers of one specific length.
    #[must_use]
    pub fn pooled_of_size(&self, size: usize) -> usize {
        self.buckets.get(&size).map_or(0, Vec::len)
    }

    /// Returns the reuse counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Drops every idle buffer. Counters are kept.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl<T: Copy + Default> Default for BufferPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> BufferSource<T> for BufferPool<T> {
    #[inline]
    fn acquire(&mut self, size: usize) -> Vec<T> {
        BufferPool::acquire(self, size)
    }

    #[inline]
    fn release(&mut self, buffer: Vec<T>) {
        BufferPool::release(self, buffer);
    }
}

/// A [`BufferPool`] behind a lock, for workers that share one pool.
///
/// Each call takes the lock for the duration of a single acquire or release;
/// grid generation itself runs without holding it. A `&SharedBufferPool` is
/// a [`BufferSource`], so every worker passes its own reference:
///
/// ```rust
/// use stratum_core::{BufferSource, SharedBufferPool};
///
/// let shared: SharedBufferPool<u16> = SharedBufferPool::new();
/// let mut handle = &shared;
///
/// let buffer = BufferSource::acquire(&mut handle, 8);
/// // the lock is free again while the buffer is in use
/// assert_eq!(shared.pooled(), 0);
/// BufferSource::release(&mut handle, buffer);
/// assert_eq!(shared.pooled(), 1);
/// ```
pub struct SharedBufferPool<T> {
    /// The guarded pool.
    inner: Mutex<BufferPool<T>>,
}

impl<T: Copy + Default> SharedBufferPool<T> {
    /// Creates an empty shared pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BufferPool::new()),
        }
    }

    /// Thread-safe [`BufferPool::acquire`].
    pub fn acquire(&self, size: usize) -> Vec<T> {
        self.inner.lock().acquire(size)
    }

    /// Thread-safe [`BufferPool::release`].
    pub fn release(&self, buffer: Vec<T>) {
        self.inner.lock().release(buffer);
    }

    /// Number of idle buffers currently held.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.inner.lock().pooled()
    }

    /// Snapshot of the reuse counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.inner.lock().stats()
    }
}

impl<T: Copy + Default> Default for SharedBufferPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> BufferSource<T> for &SharedBufferPool<T> {
    #[inline]
    fn acquire(&mut self, size: usize) -> Vec<T> {
        SharedBufferPool::acquire(self, size)
    }

    #[inline]
    fn release(&mut self, buffer: Vec<T>) {
        SharedBufferPool::release(self, buffer);
    }
}
