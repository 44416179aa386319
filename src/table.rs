//! HashTable: separately-chained table over an arena of entries.

use core::fmt;
use core::hash::BuildHasher;
use std::collections::TryReserveError;

use slotmap::{DefaultKey, SlotMap};

use crate::fnv::BuildFnv1a32;
use crate::kind::{Key, KeyKind, Value, ValueKind};

/// Bucket count used when a construction request passes zero.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Growth trigger used when the configured threshold is unusable.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Construction-time tuning knobs.
///
/// Both fields are sanitized rather than rejected: a zero capacity falls
/// back to [`DEFAULT_INITIAL_CAPACITY`] (the bucket array must never be
/// empty) and a non-finite or non-positive load factor falls back to
/// [`DEFAULT_MAX_LOAD_FACTOR`].
#[derive(Copy, Clone, Debug)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

#[derive(Debug)]
pub enum TableError {
    /// Insert of a key that is already present; the table is unchanged.
    DuplicateKey,
    /// Key payload does not match the table's key kind.
    KeyKindMismatch { expected: KeyKind, found: KeyKind },
    /// Value payload does not match the table's value kind.
    ValueKindMismatch { expected: ValueKind, found: ValueKind },
    /// The bucket array could not be allocated; the table is unchanged.
    AllocFailed(TryReserveError),
    /// Doubling the bucket count overflowed `usize`.
    CapacityOverflow,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::DuplicateKey => write!(f, "key already present"),
            TableError::KeyKindMismatch { expected, found } => {
                write!(f, "key kind mismatch: table holds {expected:?}, got {found:?}")
            }
            TableError::ValueKindMismatch { expected, found } => {
                write!(f, "value kind mismatch: table holds {expected:?}, got {found:?}")
            }
            TableError::AllocFailed(e) => write!(f, "bucket array allocation failed: {e}"),
            TableError::CapacityOverflow => write!(f, "bucket count overflow"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::AllocFailed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Entry {
    key: Key,
    value: Value,
    // Full pre-modulo hash; slot assignment is `hash % capacity`, so only
    // the modulo is recomputed on growth, never the key bytes.
    hash: u64,
    next: Option<DefaultKey>,
}

/// A hash table fixed to one key kind and one value kind.
///
/// Collisions are resolved by separate chaining: each bucket holds the head
/// of a singly-linked chain of entries living in a slotmap arena. New
/// entries are appended at the chain tail. When an insert would push the
/// load factor (`len / capacity`) to or past the configured threshold, the
/// bucket count doubles and every entry is relinked under the new capacity
/// before the insert proceeds.
///
/// Keys are unique; inserting a present key is rejected without mutation.
/// Values are copied in on insert and copied out on [`get`](Self::get)
/// (`Ptr` values copy the address only). Dropping the table releases all
/// entries and the bucket array.
pub struct HashTable<S = BuildFnv1a32> {
    key_kind: KeyKind,
    value_kind: ValueKind,
    hasher: S,
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Entry>,
    max_load_factor: f64,
}

impl HashTable<BuildFnv1a32> {
    /// New table with the default capacity and load-factor threshold.
    pub fn new(key_kind: KeyKind, value_kind: ValueKind) -> Result<Self, TableError> {
        Self::with_config(key_kind, value_kind, TableConfig::default())
    }

    /// New table with an explicit initial bucket count (zero selects the
    /// default).
    pub fn with_capacity(
        key_kind: KeyKind,
        value_kind: ValueKind,
        initial_capacity: usize,
    ) -> Result<Self, TableError> {
        Self::with_config(
            key_kind,
            value_kind,
            TableConfig {
                initial_capacity,
                ..TableConfig::default()
            },
        )
    }

    pub fn with_config(
        key_kind: KeyKind,
        value_kind: ValueKind,
        config: TableConfig,
    ) -> Result<Self, TableError> {
        Self::with_config_and_hasher(key_kind, value_kind, config, BuildFnv1a32)
    }
}

impl<S> HashTable<S>
where
    S: BuildHasher,
{
    pub fn with_config_and_hasher(
        key_kind: KeyKind,
        value_kind: ValueKind,
        config: TableConfig,
        hasher: S,
    ) -> Result<Self, TableError> {
        let capacity = if config.initial_capacity == 0 {
            DEFAULT_INITIAL_CAPACITY
        } else {
            config.initial_capacity
        };
        let max_load_factor =
            if config.max_load_factor.is_finite() && config.max_load_factor > 0.0 {
                config.max_load_factor
            } else {
                DEFAULT_MAX_LOAD_FACTOR
            };
        Ok(Self {
            key_kind,
            value_kind,
            hasher,
            buckets: alloc_buckets(capacity)?,
            slots: SlotMap::with_key(),
            max_load_factor,
        })
    }

    pub fn key_kind(&self) -> KeyKind {
        self.key_kind
    }

    pub fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// Current bucket count. Always positive.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn make_hash(&self, key: &Key) -> u64 {
        self.hasher.hash_one(key)
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash as usize) % self.buckets.len()
    }

    /// Walk the chain for `hash`, returning the matching slot and its
    /// predecessor in the chain (`None` when the match is the head).
    fn lookup(&self, hash: u64, key: &Key) -> Option<(Option<DefaultKey>, DefaultKey)> {
        let mut prev = None;
        let mut cur = self.buckets[self.bucket_of(hash)];
        while let Some(k) = cur {
            let entry = &self.slots[k];
            if entry.key == *key {
                return Some((prev, k));
            }
            prev = Some(k);
            cur = entry.next;
        }
        None
    }

    /// Insert a key/value pair. Fails with [`TableError::DuplicateKey`] if
    /// the key is present, and with a kind-mismatch error if either payload
    /// does not match the table's kinds. No failure mutates the table.
    pub fn insert(&mut self, key: Key, value: Value) -> Result<(), TableError> {
        if key.kind() != self.key_kind {
            return Err(TableError::KeyKindMismatch {
                expected: self.key_kind,
                found: key.kind(),
            });
        }
        if value.kind() != self.value_kind {
            return Err(TableError::ValueKindMismatch {
                expected: self.value_kind,
                found: value.kind(),
            });
        }

        let hash = self.make_hash(&key);
        // Duplicate scan precedes growth so a rejected insert leaves the
        // table untouched.
        if self.lookup(hash, &key).is_some() {
            return Err(TableError::DuplicateKey);
        }
        if self.needs_growth() {
            self.grow()?;
        }

        let bucket = self.bucket_of(hash);
        let k = self.slots.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        match self.buckets[bucket] {
            None => self.buckets[bucket] = Some(k),
            Some(head) => {
                let mut tail = head;
                while let Some(next) = self.slots[tail].next {
                    tail = next;
                }
                self.slots[tail].next = Some(k);
            }
        }
        Ok(())
    }

    /// Copy out the value stored under `key`. A key of a foreign kind is
    /// never present and yields `None`.
    pub fn get(&self, key: &Key) -> Option<Value> {
        if key.kind() != self.key_kind {
            return None;
        }
        let hash = self.make_hash(key);
        let (_, k) = self.lookup(hash, key)?;
        Some(self.slots[k].value.clone())
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        key.kind() == self.key_kind && self.lookup(self.make_hash(key), key).is_some()
    }

    /// Remove the entry stored under `key`, returning its value. Chain
    /// order of the remaining entries is preserved.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        if key.kind() != self.key_kind {
            return None;
        }
        let hash = self.make_hash(key);
        let (prev, k) = self.lookup(hash, key)?;
        let entry = self.slots.remove(k)?;
        match prev {
            Some(p) => self.slots[p].next = entry.next,
            None => {
                let bucket = self.bucket_of(hash);
                self.buckets[bucket] = entry.next;
            }
        }
        Some(entry.value)
    }

    /// Drop every entry and reset every bucket. Capacity is kept, so the
    /// table is immediately reusable without reallocating.
    pub fn clear(&mut self) {
        self.slots.clear();
        for bucket in &mut self.buckets {
            *bucket = None;
        }
    }

    fn needs_growth(&self) -> bool {
        (self.slots.len() + 1) as f64 / self.buckets.len() as f64 >= self.max_load_factor
    }

    fn grow(&mut self) -> Result<(), TableError> {
        let new_capacity = self
            .buckets
            .len()
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)?;
        let mut buckets = alloc_buckets(new_capacity)?;

        // Relink every live entry under the new capacity. Entries keep
        // their full hash, so only the slot assignment changes. Tail
        // pointers per bucket keep the relink pass linear.
        let mut tails: Vec<Option<DefaultKey>> = vec![None; new_capacity];
        let live: Vec<DefaultKey> = self.slots.keys().collect();
        for k in live {
            let bucket = (self.slots[k].hash as usize) % new_capacity;
            self.slots[k].next = None;
            match tails[bucket] {
                None => buckets[bucket] = Some(k),
                Some(tail) => self.slots[tail].next = Some(k),
            }
            tails[bucket] = Some(k);
        }
        self.buckets = buckets;
        Ok(())
    }
}

impl<S> fmt::Debug for HashTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("key_kind", &self.key_kind)
            .field("value_kind", &self.value_kind)
            .field("len", &self.slots.len())
            .field("capacity", &self.buckets.len())
            .field("max_load_factor", &self.max_load_factor)
            .finish()
    }
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Option<DefaultKey>>, TableError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(TableError::AllocFailed)?;
    buckets.resize(capacity, None);
    Ok(buckets)
}
