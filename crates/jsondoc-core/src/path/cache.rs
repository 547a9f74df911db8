//! Compiled-path cache.
//!
//! A [`PathCache`] is an ordinary value: create one, share it (it is
//! `Send + Sync`), or create several independent ones. Lookups run against
//! a sharded concurrent map and never block each other; inserting a newly
//! compiled path is the only synchronised step.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

use super::parser::compile;
use super::token::CompiledPath;
use crate::error::PathSyntaxError;

/// Cache tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of retained expressions. `None` means unbounded.
    ///
    /// Once full, newly compiled paths are still returned but not retained.
    pub max_entries: Option<usize>,
}

impl CacheConfig {
    pub fn unbounded() -> Self {
        Self { max_entries: None }
    }

    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Get-or-compile map from expression text to [`CompiledPath`].
#[derive(Debug, Default)]
pub struct PathCache {
    entries: DashMap<String, CompiledPath>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PathCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Return the compiled form of `expression`, compiling it on first use.
    ///
    /// Syntax errors are not cached; a malformed expression is re-parsed (and
    /// fails again) on every call.
    pub fn get_or_compile(&self, expression: &str) -> Result<CompiledPath, PathSyntaxError> {
        if let Some(entry) = self.entries.get(expression) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(expression, "path cache hit");
            return Ok(entry.value().clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = compile(expression)?;
        debug!(
            expression,
            tokens = compiled.tokens().len(),
            "path cache miss, compiled"
        );

        if self
            .config
            .max_entries
            .is_some_and(|max| self.entries.len() >= max)
        {
            debug!(expression, "path cache full, not retaining");
            return Ok(compiled);
        }

        // Another thread may have compiled the same text meanwhile; keep whichever landed first.
        let entry = self
            .entries
            .entry(expression.to_string())
            .or_insert(compiled);
        Ok(entry.value().clone())
    }

    /// Number of retained expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, expression: &str) -> bool {
        self.entries.contains_key(expression)
    }

    /// Drop every retained expression. Counters are kept.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
