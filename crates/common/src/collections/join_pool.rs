//! Interning pool for joined strings.
//!
//! [`JoinPool`] memoizes the concatenation of a sequence of string segments
//! in a [`ConcurrentTrie`] keyed by those segments. Equal segment sequences
//! always yield the same `Arc<str>` instance, so callers can compare results
//! with [`Arc::ptr_eq`] and avoid holding duplicate allocations.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use keyseq_common::collections::JoinPool;
//!
//! let pool = JoinPool::with_separator("/");
//! let first = pool.get(&["usr", "local", "bin"]);
//! let second = pool.get(&["usr".to_string(), "local".to_string(), "bin".to_string()]);
//!
//! assert_eq!(&*first, "usr/local/bin");
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::buffer_pool::{BufferPool, BufferPoolConfig};
use super::trie::{ConcurrentTrie, PrefixTree, TrieNode};
use crate::error::CommonResult;

/// Configuration for [`JoinPool`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPoolConfig {
    /// Inserted between consecutive segments
    pub separator: String,

    /// Capacity of freshly allocated scratch buffers
    pub initial_buffer_capacity: usize,

    /// Scratch buffers that grew beyond this capacity are not reused
    pub max_retained_capacity: usize,

    /// Maximum number of idle scratch buffers kept for reuse
    pub max_pooled_buffers: usize,
}

impl Default for JoinPoolConfig {
    fn default() -> Self {
        let buffers = BufferPoolConfig::default();
        Self {
            separator: String::new(),
            initial_buffer_capacity: buffers.initial_capacity,
            max_retained_capacity: buffers.max_retained_capacity,
            max_pooled_buffers: buffers.max_pooled,
        }
    }
}

impl JoinPoolConfig {
    /// Create a new configuration builder
    pub fn builder() -> JoinPoolConfigBuilder {
        JoinPoolConfigBuilder::default()
    }

    /// Quick preset joining with `separator` and default buffer sizing
    ///
    /// # Example
    /// ```
    /// use keyseq_common::collections::JoinPoolConfig;
    ///
    /// let config = JoinPoolConfig::separated(", ");
    /// assert_eq!(config.separator, ", ");
    /// ```
    pub fn separated<S: Into<String>>(separator: S) -> Self {
        Self { separator: separator.into(), ..Self::default() }
    }

    /// Quick preset that never retains scratch buffers
    pub fn unpooled<S: Into<String>>(separator: S) -> Self {
        Self { separator: separator.into(), max_pooled_buffers: 0, ..Self::default() }
    }

    fn buffer_config(&self) -> BufferPoolConfig {
        BufferPoolConfig {
            initial_capacity: self.initial_buffer_capacity,
            max_retained_capacity: self.max_retained_capacity,
            max_pooled: self.max_pooled_buffers,
        }
    }

    /// Checks the scratch buffer sizing.
    pub fn validate(&self) -> CommonResult<()> {
        self.buffer_config().validate()
    }
}

/// Builder for JoinPoolConfig with fluent API
#[derive(Debug, Default)]
pub struct JoinPoolConfigBuilder {
    config: JoinPoolConfig,
}

impl JoinPoolConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator inserted between segments
    pub fn separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.config.separator = separator.into();
        self
    }

    /// Set the capacity of freshly allocated scratch buffers
    pub fn initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_buffer_capacity = capacity;
        self
    }

    /// Set the largest scratch buffer capacity that is still reused
    pub fn max_retained_capacity(mut self, capacity: usize) -> Self {
        self.config.max_retained_capacity = capacity;
        self
    }

    /// Set the number of idle scratch buffers kept for reuse
    pub fn max_pooled_buffers(mut self, count: usize) -> Self {
        self.config.max_pooled_buffers = count;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> CommonResult<JoinPoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Thread-safe interning pool of joined strings.
pub struct JoinPool {
    trie: ConcurrentTrie<String, Arc<str>>,
    buffers: BufferPool,
    separator: String,
    empty: Arc<str>,
}

impl JoinPool {
    /// Creates a pool after validating `config`.
    pub fn new(config: JoinPoolConfig) -> CommonResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// Creates a pool joining with `separator` and default buffer sizing.
    pub fn with_separator<S: Into<String>>(separator: S) -> Self {
        Self::from_config(JoinPoolConfig::separated(separator))
    }

    fn from_config(config: JoinPoolConfig) -> Self {
        debug!(separator = %config.separator, "creating join pool");
        Self {
            trie: ConcurrentTrie::new(),
            buffers: BufferPool::with_valid_config(config.buffer_config()),
            separator: config.separator,
            empty: Arc::from(""),
        }
    }

    /// Separator inserted between segments.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Returns the interned join of `segments`.
    ///
    /// An empty slice yields a shared empty string without touching the
    /// trie.
    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Arc<str> {
        if segments.is_empty() {
            return Arc::clone(&self.empty);
        }
        self.intern(segments.iter().map(|segment| segment.as_ref()))
    }

    /// Like [`get`](Self::get), joining `None` segments as empty strings.
    pub fn get_optional<S: AsRef<str>>(&self, segments: &[Option<S>]) -> Arc<str> {
        if segments.is_empty() {
            return Arc::clone(&self.empty);
        }
        self.intern(
            segments.iter().map(|segment| segment.as_ref().map_or("", |segment| segment.as_ref())),
        )
    }

    /// Forgets every interned string.
    ///
    /// Strings already handed out stay valid; later calls build new
    /// instances.
    pub fn clear(&self) {
        self.trie.clear();
        self.buffers.clear();
        debug!("cleared join pool");
    }

    fn intern<'s, I>(&self, segments: I) -> Arc<str>
    where
        I: Iterator<Item = &'s str> + Clone,
    {
        let node = self.trie.get_or_add_node_by(segments.clone());
        if let Some(joined) = node.try_get_value() {
            trace!(len = joined.len(), "join pool hit");
            return Arc::clone(joined);
        }

        let mut buffer = self.buffers.rent();
        for (index, segment) in segments.enumerate() {
            if index > 0 {
                buffer.push_str(&self.separator);
            }
            buffer.push_str(segment);
        }
        let joined: Arc<str> = Arc::from(buffer.as_str());
        drop(buffer);
        trace!(len = joined.len(), "join pool miss");

        Arc::clone(node.get_or_add_value(joined))
    }
}

impl Default for JoinPool {
    fn default() -> Self {
        Self::with_separator("")
    }
}

impl fmt::Debug for JoinPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinPool")
            .field("separator", &self.separator)
            .field("buffers", &self.buffers)
            .finish_non_exhaustive()
    }
}
