//! In-process TTL cache for public read endpoints.
//!
//! Values are stored as serialized JSON under a [`CacheKey`] in a
//! [`moka`] cache whose per-entry lifetime comes from [`CacheKey::ttl`].
//! Writers never remove keys directly; they call [`TtlCache::invalidate`]
//! with the [`Mutation`] they performed.
//!
//! Every invalidation advances an epoch. A read-through load that started
//! before an invalidation never leaves its value behind, so the first read
//! after a write always reaches the database.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::Expiry;
use serde::Serialize;
use showreel_core::cache::{CacheKey, Mutation};

use crate::error::{AppError, AppResult};

/// Upper bound on stored entries; the key space is small and bounded by
/// the number of published projects.
const MAX_ENTRIES: u64 = 10_000;

enum KeyExpiry {
    PerKey,
    #[cfg(test)]
    Fixed(Duration),
}

impl Expiry<CacheKey, serde_json::Value> for KeyExpiry {
    fn expire_after_create(
        &self,
        key: &CacheKey,
        _value: &serde_json::Value,
        _created_at: Instant,
    ) -> Option<Duration> {
        match self {
            Self::PerKey => Some(key.ttl()),
            #[cfg(test)]
            Self::Fixed(ttl) => Some(*ttl),
        }
    }
}

/// Read-through cache keyed by [`CacheKey`].
pub struct TtlCache {
    entries: Cache<CacheKey, serde_json::Value>,
    epoch: AtomicU64,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlCache {
    pub fn new() -> Self {
        Self::with_expiry(KeyExpiry::PerKey)
    }

    fn with_expiry(expiry: KeyExpiry) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .expire_after(expiry)
            .support_invalidation_closures()
            .build();
        Self {
            entries,
            epoch: AtomicU64::new(0),
        }
    }

    /// Return the live value for `key`, if any.
    pub async fn get(&self, key: CacheKey) -> Option<serde_json::Value> {
        self.entries.get(&key).await
    }

    /// Store `value` under `key` with the key's TTL.
    pub async fn put(&self, key: CacheKey, value: serde_json::Value) {
        self.entries.insert(key, value).await;
    }

    /// Serve `key` from the cache or run `load`, cache its result and return it.
    ///
    /// Errors from `load` are returned as-is and nothing is cached. When an
    /// invalidation lands while `load` runs, the result is returned to this
    /// caller but not kept.
    pub async fn get_or_load<T, F, Fut>(&self, key: CacheKey, load: F) -> AppResult<serde_json::Value>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(hit) = self.get(key).await {
            tracing::debug!(%key, "Cache hit");
            return Ok(hit);
        }

        let started = self.epoch.load(Ordering::Acquire);
        let loaded = load().await?;
        let value = serde_json::to_value(&loaded)
            .map_err(|e| AppError::InternalError(format!("Cache serialization error: {e}")))?;

        if self.epoch.load(Ordering::Acquire) != started {
            tracing::debug!(%key, "Invalidated during load, not caching");
            return Ok(value);
        }
        self.put(key, value.clone()).await;
        // An invalidation that raced the insert above may have run its
        // removals before the value landed.
        if self.epoch.load(Ordering::Acquire) != started {
            self.entries.invalidate(&key).await;
        }
        Ok(value)
    }

    /// Drop every key the mutation may have made stale.
    pub async fn invalidate(&self, mutation: &Mutation) {
        self.epoch.fetch_add(1, Ordering::AcqRel);

        let keys = mutation.invalidated_keys();
        for key in &keys {
            self.entries.invalidate(key).await;
        }
        if mutation.shifts_ranks() {
            let dropped = self
                .entries
                .invalidate_entries_if(|key, _| matches!(key, CacheKey::Project(_)));
            if let Err(e) = dropped {
                tracing::warn!(error = %e, "Project entries not invalidated, flushing cache");
                self.entries.invalidate_all();
            }
        }
        tracing::debug!(?mutation, invalidated = keys.len(), "Cache invalidated");
    }

    /// Remove everything.
    pub async fn flush(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    /// Number of live entries after pending evictions have run.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
