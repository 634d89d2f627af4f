//! In-memory content store
//!
//! Keeps everything in process and records each marker query it answers,
//! including how much transient cache state was visible when the query began.

use crate::domain::{ContentId, ContentItem, MarkerTerm};
use crate::error::{BlockmarkError, Result};
use crate::infrastructure::query_cache::{ItemHeader, QueryCache};
use crate::infrastructure::repository::{select_page, ContentStore, MarkerQuery};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// What a marker query saw when it started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub query: MarkerQuery,
    pub cache_len_at_start: usize,
    pub returned: usize,
}

#[derive(Debug)]
pub struct MemoryStore {
    site_url: String,
    items: RefCell<BTreeMap<ContentId, ContentItem>>,
    terms: RefCell<HashMap<MarkerTerm, BTreeSet<ContentId>>>,
    queries: RefCell<Vec<QueryRecord>>,
    fail_read_on_page: Cell<Option<usize>>,
    fail_writes: Cell<bool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("http://localhost")
    }
}

impl MemoryStore {
    pub fn new(site_url: impl Into<String>) -> Self {
        MemoryStore {
            site_url: site_url.into(),
            items: RefCell::new(BTreeMap::new()),
            terms: RefCell::new(HashMap::new()),
            queries: RefCell::new(Vec::new()),
            fail_read_on_page: Cell::new(None),
            fail_writes: Cell::new(false),
        }
    }

    /// Every marker query answered so far
    pub fn queries(&self) -> Vec<QueryRecord> {
        self.queries.borrow().clone()
    }

    /// Make `query_by_marker` fail when asked for `page`
    pub fn fail_read_on_page(&self, page: Option<usize>) {
        self.fail_read_on_page.set(page);
    }

    /// Make marker attach/detach and item writes fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// True once the marker term has been created by an association
    pub fn has_term(&self, marker: MarkerTerm) -> bool {
        self.terms.borrow().contains_key(&marker)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.get() {
            return Err(BlockmarkError::Store("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl ContentStore for MemoryStore {
    fn get_item(&self, id: ContentId) -> Result<ContentItem> {
        self.items
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(BlockmarkError::ContentNotFound(id))
    }

    fn put_item(&self, item: &ContentItem) -> Result<()> {
        self.check_writable()?;
        self.items.borrow_mut().insert(item.id, item.clone());
        Ok(())
    }

    fn list_item_ids(&self) -> Result<Vec<ContentId>> {
        Ok(self.items.borrow().keys().copied().collect())
    }

    fn get_permalink_and_title(&self, id: ContentId) -> Result<(String, String)> {
        let item = self.get_item(id)?;
        Ok((item.permalink(&self.site_url), item.title))
    }

    fn query_by_marker(
        &self,
        query: &MarkerQuery,
        cache: &mut QueryCache,
    ) -> Result<Vec<ContentId>> {
        let cache_len_at_start = cache.len();

        if self.fail_read_on_page.get() == Some(query.page) {
            return Err(BlockmarkError::Store(format!(
                "read failed on page {}",
                query.page
            )));
        }

        cache.record_query(query.describe());

        let members = self.marker_members(query.marker)?;
        let items = self.items.borrow();
        let headers: Vec<(ContentId, ItemHeader)> = members
            .into_iter()
            .filter_map(|id| {
                items.get(&id).map(|item| {
                    (
                        id,
                        ItemHeader {
                            kind: item.kind,
                            published: item.published,
                        },
                    )
                })
            })
            .collect();

        let page = select_page(query, headers.iter().copied());
        let selected: HashSet<ContentId> = page.iter().copied().collect();
        for (id, header) in headers.iter().filter(|(id, _)| selected.contains(id)) {
            cache.insert_header(*id, *header);
        }
        self.queries.borrow_mut().push(QueryRecord {
            query: query.clone(),
            cache_len_at_start,
            returned: page.len(),
        });
        Ok(page)
    }

    fn attach_marker(&self, item: &ContentItem, marker: MarkerTerm) -> Result<()> {
        self.check_writable()?;
        self.terms.borrow_mut().entry(marker).or_default().insert(item.id);
        Ok(())
    }

    fn detach_marker(&self, id: ContentId, marker: MarkerTerm) -> Result<()> {
        self.check_writable()?;
        if let Some(ids) = self.terms.borrow_mut().get_mut(&marker) {
            ids.remove(&id);
        }
        Ok(())
    }

    fn marker_members(&self, marker: MarkerTerm) -> Result<BTreeSet<ContentId>> {
        Ok(self
            .terms
            .borrow()
            .get(&marker)
            .cloned()
            .unwrap_or_default())
    }
}
