//! Per-run deduplication of shared reference rows.
//!
//! Each cache maps a natural key to the store id of the row created for it.
//! The first `resolve` for a key runs the factory (which inserts the row);
//! every later call returns the stored id. Payload differences between two
//! records sharing a key are not reconciled: the first one wins.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Store-assigned surrogate id of a row.
pub type RowId = i32;

#[derive(Debug)]
pub struct ReferenceCache<K> {
    ids: HashMap<K, RowId>,
    hits: u64,
}

impl<K> Default for ReferenceCache<K> {
    fn default() -> Self {
        ReferenceCache {
            ids: HashMap::new(),
            hits: 0,
        }
    }
}

impl<K: Eq + Hash> ReferenceCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id cached for `key`, creating it with `factory` on first
    /// sight. A failing factory leaves the cache unchanged.
    pub fn resolve<F, E>(&mut self, key: K, factory: F) -> Result<RowId, E>
    where
        F: FnOnce(&K) -> Result<RowId, E>,
    {
        match self.ids.entry(key) {
            Entry::Occupied(occupied) => {
                self.hits += 1;
                Ok(*occupied.get())
            }
            Entry::Vacant(vacant) => {
                let id = factory(vacant.key())?;
                Ok(*vacant.insert(id))
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<RowId> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of lookups answered without creating a row.
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

/// The shared-entity caches of one import run.
#[derive(Debug, Default)]
pub struct References {
    pub pmids: ReferenceCache<i32>,
    pub keywords: ReferenceCache<String>,
    pub subcellular_locations: ReferenceCache<String>,
    pub tissues: ReferenceCache<String>,
    pub diseases: ReferenceCache<String>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }
}
