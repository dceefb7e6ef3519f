//! Per-session result cache

use crate::domain::{QueryResult, SectionSet};
use crate::identifiers::ChemicalIdentifier;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub identifier: ChemicalIdentifier,
    pub sections: SectionSet,
}

impl CacheKey {
    pub fn new(identifier: ChemicalIdentifier, sections: SectionSet) -> Self {
        Self {
            identifier,
            sections,
        }
    }
}

/// Storage for resolved lookups. Callers only `put` successful results.
pub trait ResultCache {
    fn get(&self, key: &CacheKey) -> Option<QueryResult>;

    fn put(&mut self, key: CacheKey, result: QueryResult);
}

/// In-memory cache living as long as one user session
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: HashMap<CacheKey, QueryResult>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl ResultCache for SessionCache {
    fn get(&self, key: &CacheKey) -> Option<QueryResult> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: CacheKey, result: QueryResult) {
        if result.success {
            self.entries.insert(key, result);
        }
    }
}
