//! Set of keys backed by a [`KeyedBucketTable`].

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

use crate::{CoreResult, KeyedBucketTable, TableConfig};

/// Presence-only companion to [`KeyedBucketTable`], used for visited sets.
pub struct BucketSet<K, S = FxBuildHasher> {
    table: KeyedBucketTable<K, (), S>,
}

impl<K> BucketSet<K, FxBuildHasher> {
    pub fn new() -> Self {
        Self { table: KeyedBucketTable::new() }
    }

    pub fn with_config(config: TableConfig) -> CoreResult<Self> {
        Ok(Self { table: KeyedBucketTable::with_config(config)? })
    }
}

impl<K, S> BucketSet<K, S> {
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }
}

impl<K, S> BucketSet<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Add `key`.  Returns `true` if it was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        if self.table.contains_key(&key) {
            return false;
        }
        self.table.associate(key, ());
        true
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(key)
    }
}

impl<K> Default for BucketSet<K, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, S> fmt::Debug for BucketSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
