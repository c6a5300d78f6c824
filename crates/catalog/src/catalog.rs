//! Session-lifetime catalog state

use dexter_core::CatalogEntity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Accumulated catalog
///
/// Entities are kept in fetch order and keyed by name: a name seen in an
/// earlier batch is never replaced or repeated. Once `complete` is set it
/// stays set.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<CatalogEntity>,
    names: HashSet<String>,
    next_offset: usize,
    complete: bool,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &[CatalogEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Offset of the next index batch to request
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Merge one fully joined batch, returning how many entities were new
    ///
    /// `raw_count` is the number of index entries the upstream returned for
    /// the batch; fewer than `batch_size` marks the catalog complete.
    pub(crate) fn merge_batch(
        &mut self,
        joined: Vec<CatalogEntity>,
        raw_count: usize,
        batch_size: usize,
    ) -> usize {
        let mut added = 0;
        for entity in joined {
            if self.names.insert(entity.name.clone()) {
                self.entities.push(entity);
                added += 1;
            }
        }

        if raw_count < batch_size {
            self.complete = true;
        } else {
            self.next_offset += batch_size;
        }

        added
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            entities: self.entities.clone(),
            next_offset: self.next_offset,
            complete: self.complete,
        }
    }
}

/// Owned copy of the catalog at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSnapshot {
    pub entities: Vec<CatalogEntity>,
    pub next_offset: usize,
    pub complete: bool,
}

/// Loading progress, published whenever a batch starts or finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatus {
    pub loaded: usize,
    pub next_offset: usize,
    pub complete: bool,
    pub loading: bool,
}

impl CatalogStatus {
    pub(crate) fn of(catalog: &Catalog, loading: bool) -> Self {
        Self {
            loaded: catalog.len(),
            next_offset: catalog.next_offset(),
            complete: catalog.is_complete(),
            loading,
        }
    }
}
