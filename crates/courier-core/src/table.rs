//! Resizable hash table with separate chaining.
//!
//! # Layout
//!
//! ```text
//! buckets: [ empty | head | empty | head → next → next | … ]
//! ```
//!
//! The first entry of a bucket lives inline in the bucket slot, so the
//! common one-entry-per-bucket case costs no extra allocation.  Collisions
//! append boxed entries to a singly-linked chain owned by the head.
//!
//! # Growth
//!
//! Before a new key is stored, the table checks whether the insertion would
//! push `len / bucket_count` above the configured maximum.  If so it doubles
//! the bucket array (repeatedly, if needed), rehashes every entry into the
//! fresh array, and drops the old one.  A single insertion can therefore cost
//! O(n); the amortized cost stays O(1).  Overwriting an existing key never
//! grows the table.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;

use rustc_hash::FxBuildHasher;
use tracing::{trace, warn};

use crate::{CoreError, CoreResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Sizing parameters for a [`KeyedBucketTable`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// Bucket count of a fresh (or cleared) table.
    pub initial_buckets: usize,
    /// Upper bound on `len / bucket_count` after any insertion.
    pub max_load_factor: f64,
}

impl TableConfig {
    pub const DEFAULT_INITIAL_BUCKETS: usize = 8;
    pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.5;

    /// Smallest accepted `max_load_factor`: at most 100 buckets per entry.
    pub const MIN_MAX_LOAD_FACTOR: f64 = 0.01;
    /// Largest accepted `initial_buckets`.
    pub const MAX_INITIAL_BUCKETS: usize = 1 << 24;

    /// Check that the table can honour this configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if !(1..=Self::MAX_INITIAL_BUCKETS).contains(&self.initial_buckets) {
            return Err(CoreError::Config(format!(
                "initial_buckets must be in [1, {}], got {}",
                Self::MAX_INITIAL_BUCKETS,
                self.initial_buckets
            )));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor < Self::MIN_MAX_LOAD_FACTOR {
            return Err(CoreError::Config(format!(
                "max_load_factor must be a finite number of at least {}, got {}",
                Self::MIN_MAX_LOAD_FACTOR,
                self.max_load_factor
            )));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_buckets: Self::DEFAULT_INITIAL_BUCKETS,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

// ── Storage ───────────────────────────────────────────────────────────────────

struct Entry<K, V> {
    key:   K,
    value: V,
    next:  Option<Box<Entry<K, V>>>,
}

impl<K, V> Entry<K, V> {
    fn new(key: K, value: V) -> Self {
        Self { key, value, next: None }
    }

    #[inline]
    fn matches<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.key.borrow() == key
    }
}

/// One slot of the bucket array: empty, or an inline head entry with its
/// collision chain.
struct Bucket<K, V> {
    head: Option<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    fn empty() -> Self {
        Self { head: None }
    }

    fn chain(&self) -> Chain<'_, K, V> {
        Chain { next: self.head.as_ref() }
    }

    /// Depth of `key` in this bucket's chain.
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.chain().position(|entry| entry.matches(key))
    }

    fn entry(&self, depth: usize) -> Option<&Entry<K, V>> {
        self.chain().nth(depth)
    }

    fn entry_mut(&mut self, depth: usize) -> Option<&mut Entry<K, V>> {
        let mut cur = self.head.as_mut();
        for _ in 0..depth {
            cur = cur?.next.as_deref_mut();
        }
        cur
    }

    /// Store a new entry (inline if the bucket is empty, else at the chain
    /// tail) and return its value slot.
    fn push(&mut self, key: K, value: V) -> &mut V {
        let entry = Entry::new(key, value);
        match self.head {
            Some(ref mut head) => {
                let mut link = &mut head.next;
                while let Some(next) = link {
                    link = &mut next.next;
                }
                &mut link.insert(Box::new(entry)).value
            }
            None => &mut self.head.insert(entry).value,
        }
    }

    /// Value slot for `key`, appending `default()` at the chain tail when
    /// absent.  The flag is `true` if an entry was added.
    fn find_or_push<F>(&mut self, key: K, default: F) -> (&mut V, bool)
    where
        K: Eq,
        F: FnOnce() -> V,
    {
        let head = match self.head {
            Some(ref mut head) => head,
            None => return (&mut self.head.insert(Entry::new(key, default())).value, true),
        };
        if head.matches(&key) {
            return (&mut head.value, false);
        }

        let mut link = &mut head.next;
        while let Some(entry) = link {
            if entry.matches(&key) {
                return (&mut entry.value, false);
            }
            link = &mut entry.next;
        }
        (&mut link.insert(Box::new(Entry::new(key, default()))).value, true)
    }
}

fn empty_buckets<K, V>(count: usize) -> Vec<Bucket<K, V>> {
    (0..count).map(|_| Bucket::empty()).collect()
}

// ── KeyedBucketTable ──────────────────────────────────────────────────────────

/// Generic chained hash table mapping `K` to `V`.
///
/// Keys are hashed with `S` (FxHash by default) and reduced modulo the
/// bucket count.  Two keys that compare equal must hash equally, which holds
/// for every `K: Hash + Eq` that upholds the usual contract (`Coordinate`,
/// `String`, …).
///
/// The table owns its bucket array and chains outright and is not `Clone`.
pub struct KeyedBucketTable<K, V, S = FxBuildHasher> {
    buckets: Vec<Bucket<K, V>>,
    len:     usize,
    config:  TableConfig,
    resizes: usize,
    hasher:  S,
}

impl<K, V> KeyedBucketTable<K, V, FxBuildHasher> {
    /// Empty table with 8 buckets and a maximum load factor of 0.5.
    pub fn new() -> Self {
        Self::from_parts(TableConfig::default(), FxBuildHasher)
    }

    pub fn with_config(config: TableConfig) -> CoreResult<Self> {
        Self::with_config_and_hasher(config, FxBuildHasher)
    }

    /// Shorthand for a default-sized table with a custom load factor.
    pub fn with_max_load_factor(max_load_factor: f64) -> CoreResult<Self> {
        Self::with_config(TableConfig { max_load_factor, ..TableConfig::default() })
    }
}

impl<K, V, S> KeyedBucketTable<K, V, S> {
    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: TableConfig, hasher: S) -> Self {
        Self {
            buckets: empty_buckets(config.initial_buckets),
            len: 0,
            config,
            resizes: 0,
            hasher,
        }
    }

    /// Number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    #[inline]
    pub fn max_load_factor(&self) -> f64 {
        self.config.max_load_factor
    }

    /// How many times the bucket array has doubled since construction or
    /// the last [`clear`](Self::clear).
    #[inline]
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    /// Drop every entry and shrink back to the initial bucket count.
    pub fn clear(&mut self) {
        self.buckets = empty_buckets(self.config.initial_buckets);
        self.len = 0;
        self.resizes = 0;
    }

    /// Iterate over all `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets:   self.buckets.iter(),
            chain:     Chain { next: None },
            remaining: self.len,
        }
    }
}

impl<K, V, S> KeyedBucketTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Insert `key → value`, or overwrite the value if `key` is present.
    ///
    /// Returns the replaced value, if any.  A new key may trigger a resize
    /// before it is stored; afterwards `load_factor() <= max_load_factor()`.
    pub fn associate(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash(&key);
        if let Some(existing) = self.value_mut(hash, &key) {
            return Some(mem::replace(existing, value));
        }
        self.insert_hashed(hash, key, value);
        None
    }

    /// Look up the value stored for `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = &self.buckets[self.slot(self.hash(key))];
        let depth = bucket.position(key)?;
        bucket.entry(depth).map(|e| &e.value)
    }

    /// Like [`find`](Self::find) but yields a mutable reference.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        self.value_mut(hash, key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets[self.slot(self.hash(key))].position(key).is_some()
    }

    /// Return the value for `key`, first storing `default()` if absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.hash(&key);
        // Only an absent key may grow the table.
        if self.needs_growth() && self.buckets[self.slot(hash)].position(&key).is_none() {
            self.reserve_one();
        }

        let slot = self.slot(hash);
        let (value, inserted) = self.buckets[slot].find_or_push(key, default);
        if inserted {
            self.len += 1;
        }
        value
    }

    // ── Internals ─────────────────────────────────────────────────────────

    #[inline]
    fn hash<Q>(&self, key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.hasher.hash_one(key)
    }

    #[inline]
    fn slot(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn value_mut<Q>(&mut self, hash: u64, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let slot = self.slot(hash);
        let bucket = &mut self.buckets[slot];
        let depth = bucket.position(key)?;
        bucket.entry_mut(depth).map(|e| &mut e.value)
    }

    #[inline]
    fn needs_growth(&self) -> bool {
        (self.len + 1) as f64 > self.config.max_load_factor * self.buckets.len() as f64
    }

    /// Grow until one more entry fits under the load factor.
    fn reserve_one(&mut self) {
        while self.needs_growth() {
            if !self.grow() {
                break;
            }
        }
    }

    /// Store a key known to be absent, growing first if required.
    fn insert_hashed(&mut self, hash: u64, key: K, value: V) -> &mut V {
        self.reserve_one();
        self.len += 1;
        let slot = self.slot(hash);
        self.buckets[slot].push(key, value)
    }

    /// Double the bucket array and redistribute every entry.  Returns `false`
    /// and leaves the table as it was if the doubled count overflows.
    fn grow(&mut self) -> bool {
        let old_count = self.buckets.len();
        let Some(new_count) = old_count.checked_mul(2) else {
            warn!(buckets = old_count, "bucket table cannot grow further");
            return false;
        };
        let old = mem::replace(&mut self.buckets, empty_buckets(new_count));

        for bucket in old {
            let Some(head) = bucket.head else { continue };

            let Entry { key, value, mut next } = head;
            self.rehome(key, value);
            while let Some(entry) = next {
                let Entry { key, value, next: rest } = *entry;
                self.rehome(key, value);
                next = rest;
            }
        }

        self.resizes += 1;
        trace!(
            from = old_count,
            to = self.buckets.len(),
            entries = self.len,
            "bucket table resized"
        );
        true
    }

    #[inline]
    fn rehome(&mut self, key: K, value: V) {
        let slot = self.slot(self.hash(&key));
        self.buckets[slot].push(key, value);
    }
}

impl<K, V> Default for KeyedBucketTable<K, V, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for KeyedBucketTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a KeyedBucketTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Iteration ─────────────────────────────────────────────────────────────────

/// Entries of one bucket, head first.
struct Chain<'a, K, V> {
    next: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = entry.next.as_deref();
        Some(entry)
    }
}

/// Borrowing iterator returned by [`KeyedBucketTable::iter`].
pub struct Iter<'a, K, V> {
    buckets:   std::slice::Iter<'a, Bucket<K, V>>,
    chain:     Chain<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.chain = self.buckets.next()?.chain();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
