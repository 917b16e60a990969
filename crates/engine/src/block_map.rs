//! Two-level block-state to acoustic mapping with a memoised hot path.
//!
//! The outer level is the substrate ("default", "foliage", "carpet", ...);
//! the inner level maps block keys to matcher lists in registration order.

use crate::acoustics::AcousticArray;
use crate::state::{BlockState, BlockStateMatcher};
use lru::LruCache;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

/// Substrate used when a registration carries no explicit prefix.
pub const SUBSTRATE_DEFAULT: &str = "default";

const LOOKUP_CACHE_CAPACITY: usize = 4096;

/// Split a registration spec into its optional substrate prefix and the
/// block pattern: `"foliage+minecraft:wheat"` -> `("foliage", pattern)`.
pub fn split_substrate(spec: &str) -> (&str, &str) {
    match spec.split_once('+') {
        Some((substrate, pattern)) => (substrate.trim(), pattern.trim()),
        None => (SUBSTRATE_DEFAULT, spec.trim()),
    }
}

type PatternList = Vec<(BlockStateMatcher, AcousticArray)>;

/// Maps `(state, substrate)` to the most specific registered acoustic
/// array. Lookups are cached; any registration purges the cache.
pub struct BlockMap {
    substrates: BTreeMap<String, BTreeMap<String, PatternList>>,
    cache: RefCell<LruCache<(BlockState, String), Option<AcousticArray>>>,
}

impl BlockMap {
    /// An empty map.
    pub fn new() -> Self {
        Self {
            substrates: BTreeMap::new(),
            cache: RefCell::new(LruCache::new(
                NonZeroUsize::new(LOOKUP_CACHE_CAPACITY).expect("capacity is non-zero"),
            )),
        }
    }

    /// Register a pattern under a substrate.
    ///
    /// Re-registering an identical pattern replaces its acoustics (later
    /// configuration overrides earlier seeding); distinct patterns of
    /// equal specificity tie-break to the earliest registration.
    pub fn register(&mut self, substrate: &str, matcher: BlockStateMatcher, acoustics: AcousticArray) {
        let patterns = self
            .substrates
            .entry(substrate.to_string())
            .or_default()
            .entry(matcher.key().to_string())
            .or_default();
        if let Some(existing) = patterns.iter_mut().find(|(m, _)| *m == matcher) {
            existing.1 = acoustics;
        } else {
            patterns.push((matcher, acoustics));
        }
        self.cache.borrow_mut().clear();
    }

    /// The most specific match for `state` under `substrate`, if any.
    pub fn lookup(&self, state: &BlockState, substrate: &str) -> Option<AcousticArray> {
        let cache_key = (state.clone(), substrate.to_string());
        if let Some(hit) = self.cache.borrow_mut().get(&cache_key) {
            return hit.clone();
        }
        let result = self.lookup_uncached(state, substrate);
        self.cache.borrow_mut().put(cache_key, result.clone());
        result
    }

    fn lookup_uncached(&self, state: &BlockState, substrate: &str) -> Option<AcousticArray> {
        let patterns = self
            .substrates
            .get(substrate)?
            .get(&state.key().to_string())?;
        let mut best: Option<(usize, &AcousticArray)> = None;
        for (matcher, acoustics) in patterns {
            if !matcher.matches(state) {
                continue;
            }
            let specificity = matcher.specificity();
            // Strictly-greater keeps the earliest registration on ties.
            if best.map(|(s, _)| specificity > s).unwrap_or(true) {
                best = Some((specificity, acoustics));
            }
        }
        best.map(|(_, acoustics)| acoustics.clone())
    }

    /// Whether any substrate has a match for `state`.
    pub fn has_acoustics(&self, state: &BlockState) -> bool {
        self.substrates
            .keys()
            .any(|substrate| self.lookup(state, substrate).is_some())
    }

    /// Registered substrate names, in stable order.
    pub fn substrates(&self) -> impl Iterator<Item = &str> {
        self.substrates.keys().map(String::as_str)
    }
}

impl Default for BlockMap {
    fn default() -> Self {
        Self::new()
    }
}
