//! Transient per-query cache owned by a single scan

use crate::domain::{ContentId, ContentKind};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// The fields a marker query filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHeader {
    pub kind: ContentKind,
    pub published: NaiveDateTime,
}

/// Item headers loaded while answering a query, plus a log of the queries issued.
///
/// A scan creates one cache and clears it between pages, so nothing loaded for
/// one page is visible to the next.
#[derive(Debug, Default)]
pub struct QueryCache {
    headers: HashMap<ContentId, ItemHeader>,
    queries: Vec<String>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self, id: ContentId) -> Option<ItemHeader> {
        self.headers.get(&id).copied()
    }

    pub fn insert_header(&mut self, id: ContentId, header: ItemHeader) {
        self.headers.insert(id, header);
    }

    pub fn record_query(&mut self, description: String) {
        self.queries.push(description);
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Number of cached entries (headers and logged queries)
    pub fn len(&self) -> usize {
        self.headers.len() + self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.headers.clear();
        self.queries.clear();
    }
}
