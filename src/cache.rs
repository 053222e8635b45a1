// ⏳ Result Cache - memoization with a fixed time-to-live
//
// Lookups never block on computation: read, compute outside any lock,
// then overwrite. Two concurrent misses on the same key may both compute;
// results are pure so the second write is harmless.
//
// Stale entries are overwritten in place on the next miss. Nothing is
// purged on the lookup path.

use crate::error::Result;
use crate::profile::Identity;
use crate::systems::NumerologySystem;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

pub const DEFAULT_TTL_HOURS: i64 = 24;

// ============================================================================
// CLOCK
// ============================================================================

/// Source of "now" for TTL checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// CACHE ENTRY
// ============================================================================

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub created_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Fresh while `now - created_at <= ttl`
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at <= ttl
    }
}

// ============================================================================
// RESULT CACHE
// ============================================================================

/// Process-local, unbounded, keyed by input identity
pub struct ResultCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        ResultCache {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// 24-hour TTL on the system clock
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::hours(DEFAULT_TTL_HOURS), Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached value, if any
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: &str, value: V) {
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            created_at: self.clock.now(),
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), entry);
    }

    /// Return the cached value, or run `compute`, store and return its result.
    /// Failed computations are not cached.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.get(key) {
            debug!(key, "cache hit");
            return Ok(value);
        }

        debug!(key, "cache miss");
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop every stale entry; returns how many were removed
    pub fn purge_stale(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "purged stale cache entries");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Entry count, stale entries included
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// CACHE KEYS
// ============================================================================

fn identity_material(identity: &Identity, system: &NumerologySystem) -> String {
    let current = identity
        .current_name()
        .map(|name| system.normalize_name(name))
        .unwrap_or_default();
    format!(
        "{}|{}|{}|{}",
        system.normalize_name(identity.full_name()),
        identity.birth_date().format("%Y-%m-%d"),
        current,
        system.name()
    )
}

fn digest(material: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Key for one profile: SHA-256 of normalized names, ISO date and system
pub fn profile_key(identity: &Identity, system: &NumerologySystem) -> String {
    digest(&identity_material(identity, system))
}

/// Key for a pair; order-independent since scoring is symmetric
pub fn compatibility_key(a: &Identity, b: &Identity, system: &NumerologySystem) -> String {
    let mut parts = [identity_material(a, system), identity_material(b, system)];
    parts.sort();
    digest(&format!("compat|{}|{}", parts[0], parts[1]))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::Cell;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn cache_with_clock() -> (ResultCache<u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = ResultCache::new(Duration::hours(24), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_computes_once_within_ttl() {
        let (cache, clock) = cache_with_clock();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(42)
        };

        assert_eq!(cache.get_or_compute("k", compute).unwrap(), 42);
        clock.advance(Duration::hours(23));
        assert_eq!(cache.get_or_compute("k", compute).unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_recomputes_after_expiry() {
        let (cache, clock) = cache_with_clock();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        };

        assert_eq!(cache.get_or_compute("k", compute).unwrap(), 1);
        clock.advance(Duration::hours(24) + Duration::seconds(1));
        assert_eq!(cache.get_or_compute("k", compute).unwrap(), 2);
        assert_eq!(calls.get(), 2);
        // stale entry overwritten in place
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_exact_ttl_boundary_is_fresh() {
        let (cache, clock) = cache_with_clock();
        cache.insert("k", 7);
        clock.advance(Duration::hours(24));
        assert_eq!(cache.get("k"), Some(7));
        clock.advance(Duration::milliseconds(1));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let (cache, _clock) = cache_with_clock();
        let result = cache.get_or_compute("k", || {
            Err(crate::error::NumerologyError::validation("fullName", "empty"))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_stale() {
        let (cache, clock) = cache_with_clock();
        cache.insert("old", 1);
        clock.advance(Duration::hours(30));
        cache.insert("new", 2);

        assert_eq!(cache.purge_stale(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new"), Some(2));
    }

    #[test]
    fn test_profile_key_normalizes_name() {
        let system = NumerologySystem::pythagorean();
        let a = Identity::parse("John Doe", "1990-01-15").unwrap();
        let b = Identity::parse("JOHN-DOE", "1990-01-15").unwrap();
        let c = Identity::parse("John Doe", "1990-01-16").unwrap();

        assert_eq!(profile_key(&a, &system), profile_key(&b, &system));
        assert_ne!(profile_key(&a, &system), profile_key(&c, &system));
        assert_ne!(
            profile_key(&a, &system),
            profile_key(&a, &NumerologySystem::chaldean())
        );
        assert_eq!(profile_key(&a, &system).len(), 64);
    }

    #[test]
    fn test_profile_key_includes_current_name() {
        let system = NumerologySystem::pythagorean();
        let a = Identity::parse("John Doe", "1990-01-15").unwrap();
        let renamed = a.clone().with_current_name("Johnny Doe").unwrap();

        assert_ne!(profile_key(&a, &system), profile_key(&renamed, &system));
    }

    #[test]
    fn test_compatibility_key_order_independent() {
        let system = NumerologySystem::pythagorean();
        let a = Identity::parse("John Doe", "1990-01-15").unwrap();
        let b = Identity::parse("Jane Roe", "1992-03-08").unwrap();

        assert_eq!(
            compatibility_key(&a, &b, &system),
            compatibility_key(&b, &a, &system)
        );
        assert_ne!(compatibility_key(&a, &b, &system), profile_key(&a, &system));
    }

    #[test]
    fn test_concurrent_misses_are_harmless() {
        let cache = Arc::new(ResultCache::<u32>::with_default_ttl());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.get_or_compute("shared", || Ok(9)).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 9);
        }
        assert_eq!(cache.len(), 1);
    }
}
