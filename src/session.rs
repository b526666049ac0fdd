//! Explicit execution context for pipeline operations.
//!
//! The original workflow leaned on an ambient engine session created once
//! and referenced implicitly everywhere. Here the context is an explicit
//! [`Session`] object with a create/use/dispose lifecycle: construct it
//! from a [`SessionConfig`], pass it to every operation that computes, and
//! drop it to release the worker pool.
//!
//! The session owns a local rayon thread pool rather than touching the
//! global one, so two sessions with different thread counts can coexist in
//! one process.
//!
//! # Example
//!
//! ```
//! use lag_feature_builder::session::{Session, SessionConfig};
//!
//! let session = Session::from_config(SessionConfig::new().with_threads(2)).unwrap();
//! let sum: i32 = session.install(|| (1..=10).sum());
//! assert_eq!(sum, 55);
//! // Dropping the session disposes the pool.
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Worker pool configuration for a [`Session`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of worker threads.
    ///
    /// - `None`: rayon's default (typically the CPU count)
    /// - `Some(n)`: exactly n threads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,

    /// Stack size per worker thread in bytes (advanced).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_size: Option<usize>,
}

impl SessionConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `threads` is 0.
    pub fn with_threads(mut self, threads: usize) -> Self {
        assert!(threads > 0, "Thread count must be > 0");
        self.num_threads = Some(threads);
        self
    }

    /// Set a custom per-thread stack size.
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }
}

/// Execution context owning a local worker pool.
///
/// Every operation that fans out over partitions borrows a `Session`; no
/// global state is involved. The pool is released when the session is
/// dropped.
pub struct Session {
    pool: rayon::ThreadPool,
    config: SessionConfig,
}

impl Session {
    /// Create a session with default configuration.
    pub fn new() -> Result<Self> {
        Self::from_config(SessionConfig::default())
    }

    /// Create a session from a configuration.
    pub fn from_config(config: SessionConfig) -> Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();

        if let Some(threads) = config.num_threads {
            builder = builder.num_threads(threads);
        }
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let pool = builder
            .build()
            .map_err(|e| Error::generic(format!("failed to create thread pool: {e}")))?;

        log::debug!("session created with {} worker threads", pool.current_num_threads());

        Ok(Self { pool, config })
    }

    /// Run a closure inside the session's pool.
    ///
    /// Rayon parallel iterators used inside the closure execute on this
    /// session's workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Effective number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// The configuration this session was built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("num_threads", &self.num_threads())
            .field("config", &self.config)
            .finish()
    }
}
