use core::cmp::Reverse;
use alloc::collections::{BTreeMap, BinaryHeap};

use crate::time::{Duration, Instant};

/// A keyed store whose entries expire a fixed time after they were last written.
///
/// Lookups are by key in a map. Eviction walks a min-heap of deadlines so that it only touches
/// entries that are actually due. Refreshing an entry does not search the heap, the superseded
/// deadline stays behind and is recognized as stale when it surfaces.
///
/// An entry written at `t` with lifetime `l` is live for all `now < t + l` and is removed by the
/// first `evict(now)` with `now >= t + l`. Expiry is only ever applied by `evict`, a lookup
/// returns whatever has not been evicted yet.
///
/// ```
/// use minnow::storage::Expiring;
/// use minnow::time::{Duration, Instant};
///
/// let mut store = Expiring::new();
/// store.insert(1u32, "one", Instant::from_millis(0), Duration::from_millis(100));
/// assert_eq!(store.evict(Instant::from_millis(99)), 0);
/// assert_eq!(store.get(&1), Some(&"one"));
/// assert_eq!(store.evict(Instant::from_millis(100)), 1);
/// assert!(store.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Expiring<K, V> {
    entries: BTreeMap<K, Entry<V>>,
    deadlines: BinaryHeap<Reverse<(Instant, K)>>,
}

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<K: Ord + Clone, V> Expiring<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Expiring {
            entries: BTreeMap::new(),
            deadlines: BinaryHeap::new(),
        }
    }

    /// Insert or refresh an entry.
    ///
    /// The entry expires `lifetime` after `now`, regardless of any previous deadline. Returns the
    /// value that was replaced, if any.
    pub fn insert(&mut self, key: K, value: V, now: Instant, lifetime: Duration) -> Option<V> {
        let expires_at = now + lifetime;
        self.deadlines.push(Reverse((expires_at, key.clone())));
        self.entries
            .insert(key, Entry { value, expires_at })
            .map(|old| old.value)
    }

    /// Look up a live entry.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Check if an entry is present.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// The deadline of an entry.
    pub fn expires_at(&self, key: &K) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.expires_at)
    }

    /// Remove an entry before it expires.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        // The deadline in the heap goes stale and is skipped later.
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item=(&K, &V)> + '_ {
        self.entries.iter().map(|(key, entry)| (key, &entry.value))
    }

    /// Remove all entries whose deadline is at or before `now`.
    ///
    /// Returns the number of removed entries.
    pub fn evict(&mut self, now: Instant) -> usize {
        let mut evicted = 0;

        while let Some(Reverse((deadline, _))) = self.deadlines.peek() {
            if *deadline > now {
                break;
            }

            let Reverse((deadline, key)) = match self.deadlines.pop() {
                Some(due) => due,
                None => break,
            };

            // Only the latest deadline of an entry is authoritative.
            let current = self.entries.get(&key).map(|entry| entry.expires_at);
            if current == Some(deadline) {
                self.entries.remove(&key);
                evicted += 1;
            }
        }

        if self.entries.is_empty() {
            self.deadlines.clear();
        }

        evicted
    }
}

impl<K: Ord + Clone, V> Default for Expiring<K, V> {
    fn default() -> Self {
        Expiring::new()
    }
}
