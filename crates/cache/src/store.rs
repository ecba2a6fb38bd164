use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::Mutex;

use crate::clock::{Clock, RealClock};
use crate::handle::SessionHandle;

pub const DEFAULT_MAX_SIZE: usize = 100;
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum live entries. Values below 1 are treated as 1.
    pub max_size: usize,
    /// Age after which an entry is no longer returned.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            ttl: DEFAULT_TTL,
        }
    }
}

struct CacheEntry<T> {
    value: Arc<T>,
    created_at: Instant,
}

struct CacheInner<T> {
    entries: HashMap<SessionHandle, CacheEntry<T>>,
    /// Insertion order, oldest first. Holds exactly the keys of `entries`.
    order: VecDeque<SessionHandle>,
}

impl<T> CacheInner<T> {
    fn remove(&mut self, handle: &SessionHandle) {
        if self.entries.remove(handle).is_some() {
            self.order.retain(|h| h != handle);
        }
    }

    fn sweep(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| !is_expired(e.created_at, now, ttl));
        let entries = &self.entries;
        self.order.retain(|h| entries.contains_key(h));
        before - self.entries.len()
    }
}

fn is_expired(created_at: Instant, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(created_at) > ttl
}

/// Bounded, expiring store of immutable results keyed by [`SessionHandle`].
///
/// Eviction is by insertion order: reads never refresh an entry. All
/// operations serialize on one lock.
pub struct ResultCache<T, C: Clock = RealClock> {
    inner: Mutex<CacheInner<T>>,
    config: CacheConfig,
    clock: C,
}

impl<T> ResultCache<T, RealClock> {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, RealClock)
    }
}

impl<T> Default for ResultCache<T, RealClock> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<T, C: Clock> ResultCache<T, C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        let config = CacheConfig {
            max_size: config.max_size.max(1),
            ..config
        };
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            config,
            clock,
        }
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Store a result and return its new handle.
    ///
    /// Expired entries are dropped first; if the cache is still full the
    /// oldest insertion is evicted.
    pub fn put(&self, value: T) -> SessionHandle {
        let now = self.clock.now();
        let mut inner = self.inner.lock();

        let expired = inner.sweep(now, self.config.ttl);
        if expired > 0 {
            debug!("cache: dropped {expired} expired entries");
        }

        while inner.entries.len() >= self.config.max_size {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                    debug!("cache: evicted {oldest} (capacity {})", self.config.max_size);
                }
                None => break,
            }
        }

        let mut handle = SessionHandle::generate();
        while inner.entries.contains_key(&handle) {
            handle = SessionHandle::generate();
        }

        inner.entries.insert(
            handle,
            CacheEntry {
                value: Arc::new(value),
                created_at: now,
            },
        );
        inner.order.push_back(handle);
        handle
    }

    /// Fetch a live result. An expired entry is removed and reported absent.
    pub fn get(&self, handle: &SessionHandle) -> Option<Arc<T>> {
        let now = self.clock.now();
        let mut inner = self.inner.lock();

        match inner.entries.get(handle) {
            None => return None,
            Some(entry) if !is_expired(entry.created_at, now, self.config.ttl) => {
                return Some(Arc::clone(&entry.value));
            }
            Some(_) => {}
        }

        inner.remove(handle);
        debug!("cache: {handle} expired on read");
        None
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        self.inner.lock().sweep(now, self.config.ttl)
    }

    /// Stored entries, including ones that expired but were not yet swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
