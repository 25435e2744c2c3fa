// File: crates/chart-core/src/cache.rs
// Summary: Memo keys and the LRU cache of segmented lines.
//
// Series are immutable behind `Arc`, so identity (pointer) stands in for content.
// Each cache entry holds its `Arc<Series>`, which keeps the address from being reused
// while the entry is alive.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::trace;

use crate::scale::{ScaleMapping, ScaleMode};
use crate::segment::{SegmentedLine, ThresholdSegmenter};
use crate::series::Series;
use crate::types::Size;

pub const SEGMENT_CACHE_CAPACITY: usize = 64;

/// Identity of everything a segmented line depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    series: usize,
    len: usize,
    upper: Option<u64>,
    lower: Option<u64>,
    mapping: [u64; 8],
}

impl SegmentKey {
    pub fn new(series: &Arc<Series>, mapping: &ScaleMapping) -> Self {
        Self {
            series: Arc::as_ptr(series) as usize,
            len: series.data.len(),
            upper: series.upper_limit.map(f64::to_bits),
            lower: series.lower_limit.map(f64::to_bits),
            mapping: mapping.key_bits(),
        }
    }
}

/// Least-recently-used store of segmenter output.
pub struct SegmentCache {
    inner: LruCache<SegmentKey, (Arc<Series>, Arc<SegmentedLine>)>,
    hits: u64,
    misses: u64,
}

impl Default for SegmentCache {
    fn default() -> Self {
        Self::with_capacity(SEGMENT_CACHE_CAPACITY)
    }
}

impl SegmentCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self { inner: LruCache::new(cap), hits: 0, misses: 0 }
    }

    /// Cached segmentation of `series` under `mapping`, computing it on a miss.
    pub fn get_or_segment(&mut self, series: &Arc<Series>, mapping: &ScaleMapping) -> Arc<SegmentedLine> {
        let key = SegmentKey::new(series, mapping);
        if let Some((owner, line)) = self.inner.get(&key) {
            if Arc::ptr_eq(owner, series) {
                self.hits += 1;
                trace!(tag = %series.tag, "segment cache hit");
                return Arc::clone(line);
            }
        }
        self.misses += 1;
        let line = Arc::new(ThresholdSegmenter::for_series(series).segment(series, mapping));
        self.inner.put(key, (Arc::clone(series), Arc::clone(&line)));
        line
    }

    pub fn hits(&self) -> u64 { self.hits }
    pub fn misses(&self) -> u64 { self.misses }
    pub fn len(&self) -> usize { self.inner.len() }
    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// Hash of the inputs a chart scene depends on: series identities and limits,
/// container size and scale mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderKey(u64);

impl RenderKey {
    pub fn new(series: &[Arc<Series>], size: Size, mode: ScaleMode) -> Self {
        let mut h = DefaultHasher::new();
        for s in series {
            (Arc::as_ptr(s) as usize).hash(&mut h);
            s.data.len().hash(&mut h);
            s.upper_limit.map(f64::to_bits).hash(&mut h);
            s.lower_limit.map(f64::to_bits).hash(&mut h);
        }
        size.width.to_bits().hash(&mut h);
        size.height.to_bits().hash(&mut h);
        mode.hash(&mut h);
        Self(h.finish())
    }
}
