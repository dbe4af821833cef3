//! Pool of reusable `String` scratch buffers.
//!
//! [`BufferPool::rent`] hands out a [`PooledBuffer`] guard. Dropping the
//! guard clears the buffer and returns it to the pool, unless its capacity
//! grew past [`BufferPoolConfig::max_retained_capacity`] or the pool already
//! holds [`BufferPoolConfig::max_pooled`] buffers.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{CommonError, CommonResult};

/// Buffer pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPoolConfig {
    /// Capacity of freshly allocated buffers
    pub initial_capacity: usize,

    /// Buffers that grew beyond this capacity are dropped instead of pooled
    pub max_retained_capacity: usize,

    /// Maximum number of idle buffers kept by the pool
    pub max_pooled: usize,
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self { initial_capacity: 64, max_retained_capacity: 1024, max_pooled: 8 }
    }
}

impl BufferPoolConfig {
    /// Set the capacity of freshly allocated buffers
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the largest capacity a returned buffer may have and still be pooled
    #[must_use]
    pub fn max_retained_capacity(mut self, capacity: usize) -> Self {
        self.max_retained_capacity = capacity;
        self
    }

    /// Set the number of idle buffers kept by the pool
    #[must_use]
    pub fn max_pooled(mut self, count: usize) -> Self {
        self.max_pooled = count;
        self
    }

    /// Checks that fresh buffers are small enough to be retained.
    pub fn validate(&self) -> CommonResult<()> {
        if self.initial_capacity > self.max_retained_capacity {
            return Err(CommonError::validation_with_value(
                "initial_capacity",
                "must not exceed max_retained_capacity",
                self.initial_capacity.to_string(),
            ));
        }
        Ok(())
    }
}

/// Thread-safe pool of `String` buffers.
///
/// # Examples
///
/// ```
/// use keyseq_common::collections::BufferPool;
///
/// let pool = BufferPool::default();
/// {
///     let mut buffer = pool.rent();
///     buffer.push_str("scratch");
///     assert_eq!(&*buffer, "scratch");
/// }
/// assert_eq!(pool.pooled(), 1);
/// assert!(pool.rent().is_empty());
/// ```
pub struct BufferPool {
    config: BufferPoolConfig,
    buffers: Mutex<Vec<String>>,
}

impl BufferPool {
    /// Creates a pool after validating `config`.
    pub fn new(config: BufferPoolConfig) -> CommonResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    pub(crate) fn with_valid_config(config: BufferPoolConfig) -> Self {
        Self { config, buffers: Mutex::new(Vec::with_capacity(config.max_pooled)) }
    }

    /// Active configuration.
    pub fn config(&self) -> &BufferPoolConfig {
        &self.config
    }

    /// Takes an idle buffer, or allocates one when the pool is empty.
    ///
    /// The returned buffer is always empty.
    pub fn rent(&self) -> PooledBuffer<'_> {
        let buffer = match self.buffers.lock().pop() {
            Some(buffer) => buffer,
            None => {
                trace!(capacity = self.config.initial_capacity, "allocating pooled buffer");
                String::with_capacity(self.config.initial_capacity)
            }
        };
        PooledBuffer { pool: self, buffer: Some(buffer) }
    }

    /// Number of idle buffers currently held.
    pub fn pooled(&self) -> usize {
        self.buffers.lock().len()
    }

    /// Drops every idle buffer.
    pub fn clear(&self) {
        self.buffers.lock().clear();
    }

    fn give_back(&self, mut buffer: String) {
        let capacity = buffer.capacity();
        if capacity == 0 {
            return;
        }
        if capacity > self.config.max_retained_capacity {
            debug!(
                capacity,
                max_retained_capacity = self.config.max_retained_capacity,
                "dropping oversized buffer"
            );
            return;
        }
        buffer.clear();
        let mut buffers = self.buffers.lock();
        if buffers.len() < self.config.max_pooled {
            buffers.push(buffer);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::with_valid_config(BufferPoolConfig::default())
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("config", &self.config)
            .field("pooled", &self.pooled())
            .finish()
    }
}

/// Buffer rented from a [`BufferPool`]; returned to the pool on drop.
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Option<String>,
}

impl PooledBuffer<'_> {
    /// Detaches the buffer from the pool.
    #[must_use]
    pub fn into_string(mut self) -> String {
        self.buffer.take().unwrap_or_default()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        self.buffer.as_ref().unwrap_or(&EMPTY)
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        self.buffer.get_or_insert_with(String::new)
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.give_back(buffer);
        }
    }
}

impl fmt::Debug for PooledBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledBuffer").field(&**self).finish()
    }
}

static EMPTY: String = String::new();
