use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::regex::ast::CompiledPattern;
use crate::regex::error::Result;
use crate::regex::parser::build_pattern;

/// Compiled patterns keyed by source text. Entries are never evicted.
///
/// The lookup, the parse and the insert all happen under one lock, so two
/// threads compiling the same new source get the same `Arc`.
#[derive(Default)]
pub struct PatternCache {
    patterns: Mutex<HashMap<String, Arc<CompiledPattern>>>,
    compilations: AtomicUsize,
}

static GLOBAL: Lazy<PatternCache> = Lazy::new(PatternCache::new);

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`crate::compile`].
    pub fn global() -> &'static PatternCache {
        &GLOBAL
    }

    pub fn compile(&self, source: &str) -> Result<Arc<CompiledPattern>> {
        let mut patterns = self.lock();
        if let Some(pattern) = patterns.get(source) {
            trace!("pattern cache hit for {source:?}");
            return Ok(Arc::clone(pattern));
        }

        debug!("compiling pattern {source:?}");
        self.compilations.fetch_add(1, Ordering::Relaxed);
        let pattern = Arc::new(build_pattern(source)?);
        patterns.insert(source.to_string(), Arc::clone(&pattern));
        Ok(pattern)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// How many times a source was actually parsed, failed attempts included.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    // A panic while holding the lock can't leave a half-built entry behind
    // (insertion is the last step), so a poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<CompiledPattern>>> {
        self.patterns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
