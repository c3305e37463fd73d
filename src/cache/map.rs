//! Entry Map Module
//!
//! Synchronous engine shared by the memory cache and the memory state store.
//! Callers supply the current time and hold the lock around every call.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats};

/// Outcome of a single key lookup.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lookup<V> {
    /// Live value found
    Hit(V),
    /// No entry under the key
    Miss,
    /// Entry was expired and has been removed
    Expired,
}

impl<V> Lookup<V> {
    pub(crate) fn into_value(self) -> Option<V> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss | Lookup::Expired => None,
        }
    }
}

/// Result of a capacity-triggered cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Cleanup {
    /// Entries removed because they had expired
    pub expired: usize,
    /// Live entry evicted for being soonest to expire, if any
    pub evicted: Option<String>,
}

/// Entry tagged with the sequence number of its first insertion.
#[derive(Debug)]
struct Slot<V> {
    seq: u64,
    entry: CacheEntry<V>,
}

// == Entry Map ==
/// Key to entry mapping with a manually maintained live count.
#[derive(Debug)]
pub(crate) struct EntryMap<V> {
    entries: HashMap<String, Slot<V>>,
    /// Sequence number handed to the next inserted key
    next_seq: u64,
    /// Always equals `entries.len()` once a method returns
    count: usize,
    stats: CacheStats,
}

impl<V: Clone> EntryMap<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
            count: 0,
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Returns the value under `key`.
    ///
    /// When `check_expiry` is set and the entry has expired, the entry is
    /// removed as a side effect and the lookup reports [`Lookup::Expired`].
    /// A hit never refreshes the expiration.
    pub(crate) fn lookup(&mut self, key: &str, now: i64, check_expiry: bool) -> Lookup<V> {
        let expired = match self.entries.get(key) {
            Some(slot) => check_expiry && slot.entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return Lookup::Miss;
            }
        };

        if expired {
            self.take(key);
            self.stats.record_expiration();
            return Lookup::Expired;
        }

        self.stats.record_hit();
        match self.entries.get(key) {
            Some(slot) => Lookup::Hit(slot.entry.value().clone()),
            None => Lookup::Miss,
        }
    }

    // == Upsert ==
    /// Updates the entry in place or inserts a new one.
    ///
    /// Returns true when a new key was inserted. An update keeps the key's
    /// original sequence number.
    pub(crate) fn upsert(&mut self, key: &str, value: V, timeout_ms: i64, now: i64) -> bool {
        let inserted = match self.entries.get_mut(key) {
            Some(slot) => {
                slot.entry.set_value(value, timeout_ms, now);
                false
            }
            None => {
                let slot = Slot {
                    seq: self.next_seq,
                    entry: CacheEntry::new(key, value, timeout_ms, now),
                };
                self.entries.insert(key.to_string(), slot);
                self.next_seq += 1;
                self.count += 1;
                true
            }
        };

        self.stats.set_total_entries(self.count);
        inserted
    }

    // == Take ==
    /// Removes the entry under `key`, returning its value.
    pub(crate) fn take(&mut self, key: &str) -> Option<V> {
        let slot = self.entries.remove(key)?;
        self.count -= 1;
        self.stats.set_total_entries(self.count);
        Some(slot.entry.into_value())
    }

    // == Cleanup ==
    /// Single pass over all entries.
    ///
    /// Drops every expired entry and remembers the live entry with the
    /// smallest `(expiration, seq)`, so the earliest inserted key wins a tie.
    /// If the survivors still exceed `max_size`, that one entry is evicted
    /// too. Never removes more than one live entry per call.
    pub(crate) fn cleanup(&mut self, now: i64, max_size: usize) -> Cleanup {
        let mut expired_keys = Vec::new();
        let mut oldest: Option<(i64, u64, &str)> = None;

        for (key, slot) in &self.entries {
            if slot.entry.is_expired(now) {
                expired_keys.push(key.clone());
                continue;
            }

            let rank = (slot.entry.expiration(), slot.seq);
            if oldest.map_or(true, |(expiration, seq, _)| rank < (expiration, seq)) {
                oldest = Some((rank.0, rank.1, key.as_str()));
            }
        }
        let oldest = oldest.map(|(_, _, key)| key.to_string());

        for key in &expired_keys {
            self.entries.remove(key);
        }
        self.count = self.entries.len();

        let mut result = Cleanup {
            expired: expired_keys.len(),
            evicted: None,
        };

        if self.count > max_size {
            if let Some(key) = oldest {
                self.take(&key);
                result.evicted = Some(key);
            }
        }

        let removed = result.expired + usize::from(result.evicted.is_some());
        self.stats.record_evictions(removed);
        self.stats.set_total_entries(self.count);
        result
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub(crate) fn purge_expired(&mut self, now: i64) -> usize {
        self.entries.retain(|_, slot| !slot.entry.is_expired(now));

        let removed = self.count - self.entries.len();
        self.count = self.entries.len();
        self.stats.record_evictions(removed);
        self.stats.set_total_entries(self.count);
        removed
    }

    /// Drops every entry. Counters other than the entry total are kept.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
        self.stats.set_total_entries(0);
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Checks `count` against the real map size.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.count == self.entries.len()
    }
}
