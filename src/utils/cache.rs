//! Validation Cache Module
//!
//! Memoizes address validation results keyed by the raw address.
//! Uses DashMap so one scanner can be shared across threads.
//!
//! Features:
//! - TTL-based expiration (5 minutes default)
//! - Opportunistic sweep of stale entries once the map grows past a threshold
//! - Injectable clock so expiry can be tested without sleeping
//! - HIT/MISS counters

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::types::AddressKind;
use crate::utils::constants::{DEFAULT_CACHE_PRUNE_THRESHOLD, DEFAULT_CACHE_TTL_SECS};

/// Time source for cache timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }
}

/// Cached validation outcome
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidationCacheEntry {
    pub is_valid: bool,
    pub timestamp: Instant,
    pub kind: Option<AddressKind>,
}

impl ValidationCacheEntry {
    /// Stale once strictly older than the TTL
    #[inline]
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) > ttl
    }
}

/// Address validation cache
#[derive(Clone)]
pub struct ValidationCache {
    store: Arc<DashMap<String, ValidationCacheEntry>>,
    ttl: Duration,
    prune_threshold: usize,
    clock: Arc<dyn Clock>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    pruned: Arc<AtomicU64>,
}

impl Default for ValidationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationCache")
            .field("entries", &self.store.len())
            .field("ttl", &self.ttl)
            .field("prune_threshold", &self.prune_threshold)
            .finish()
    }
}

impl ValidationCache {
    /// Cache with default TTL (5 minutes) and prune threshold (1000)
    pub fn new() -> Self {
        Self::with_clock(
            Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            DEFAULT_CACHE_PRUNE_THRESHOLD,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(ttl: Duration, prune_threshold: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl,
            prune_threshold,
            clock,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            pruned: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fresh entry for `address`, or None on miss / expiry
    pub fn get(&self, address: &str) -> Option<ValidationCacheEntry> {
        let now = self.clock.now();

        match self.store.get(address) {
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(address, "validation cache hit");
                Some(*entry)
            }
            Some(_) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(address, "validation cache miss (expired)");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store (or overwrite) a result stamped with the current time
    pub fn put(&self, address: &str, is_valid: bool, kind: Option<AddressKind>) {
        let entry = ValidationCacheEntry {
            is_valid,
            timestamp: self.clock.now(),
            kind,
        };
        self.store.insert(address.to_string(), entry);

        if self.store.len() > self.prune_threshold {
            self.prune_expired();
        }
    }

    /// Remove every entry older than the TTL, returns how many went
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired(now, self.ttl));
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            self.pruned.fetch_add(removed as u64, Ordering::Relaxed);
            info!("🧹 Validation cache sweep: {} stale entries removed", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            pruned: self.pruned.load(Ordering::Relaxed),
            hit_rate,
            ttl_secs: self.ttl.as_secs(),
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub pruned: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}
