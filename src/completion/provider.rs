//! Value providers for known-value completion
//!
//! The engine asks a [`ValueProvider`] for the distinct values of a field at
//! most once per value-completion request. Failures are not masked.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::schema::FieldDescriptor;
use crate::schema::loader::KnownValues;

/// Source of distinct known values for value-completable fields
pub trait ValueProvider: Send + Sync {
    /// Distinct values of `field`; may be empty, must terminate
    fn known_values(&self, field: &FieldDescriptor) -> Result<BTreeSet<String>>;
}

impl<P: ValueProvider + ?Sized> ValueProvider for Arc<P> {
    fn known_values(&self, field: &FieldDescriptor) -> Result<BTreeSet<String>> {
        (**self).known_values(field)
    }
}

/// Provider that knows no values
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValueProvider;

impl ValueProvider for NoValueProvider {
    fn known_values(&self, _field: &FieldDescriptor) -> Result<BTreeSet<String>> {
        Ok(BTreeSet::new())
    }
}

/// Provider serving a fixed value table, replaceable as a whole
///
/// Clones share the table, so one clone can publish while another serves.
#[derive(Debug, Clone, Default)]
pub struct StaticValueProvider {
    values: Arc<RwLock<Arc<KnownValues>>>,
}

impl StaticValueProvider {
    pub fn new(values: KnownValues) -> Self {
        Self {
            values: Arc::new(RwLock::new(Arc::new(values))),
        }
    }

    /// Replace the value table
    pub fn publish(&self, values: KnownValues) {
        let mut current = self.values.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(values);
    }

    fn snapshot(&self) -> Arc<KnownValues> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ValueProvider for StaticValueProvider {
    fn known_values(&self, field: &FieldDescriptor) -> Result<BTreeSet<String>> {
        Ok(self
            .snapshot()
            .get(&field.name)
            .cloned()
            .unwrap_or_default())
    }
}

/// Cached values of one field
struct ValueCache {
    values: BTreeSet<String>,
    /// When the cache was last updated
    last_fetch: Instant,
}

impl ValueCache {
    fn is_valid(&self, ttl: Duration) -> bool {
        self.last_fetch.elapsed() < ttl
    }
}

/// Caller-side TTL cache around another provider
///
/// Failed lookups are not cached.
pub struct CachedValueProvider<P> {
    inner: P,
    cache: RwLock<HashMap<String, ValueCache>>,
    /// Time-to-live for cache entries
    ttl: Duration,
}

impl<P: ValueProvider> CachedValueProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Drop every cached entry
    pub fn invalidate(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: ValueProvider> ValueProvider for CachedValueProvider<P> {
    fn known_values(&self, field: &FieldDescriptor) -> Result<BTreeSet<String>> {
        // Check cache first
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = cache.get(&field.name) {
                if entry.is_valid(self.ttl) {
                    return Ok(entry.values.clone());
                }
            }
        }

        // Cache miss or expired
        let values = self.inner.known_values(field)?;
        debug!("Fetched {} known values for '{}'", values.len(), field.name);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.insert(
            field.name.clone(),
            ValueCache {
                values: values.clone(),
                last_fetch: Instant::now(),
            },
        );

        Ok(values)
    }
}
