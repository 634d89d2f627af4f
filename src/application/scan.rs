//! Bulk scan of marker-tagged content
//!
//! Pages through the marked set in fixed-size batches. Each page is requested
//! with a cache owned by the scan, and that cache is cleared as soon as the page
//! has been fetched, so memory use stays flat no matter how many pages a scan walks.

use crate::domain::{ContentId, ContentKind, DateWindow, MarkerTerm, ScanRequest, DEFAULT_WINDOW_DAYS};
use crate::error::Result;
use crate::infrastructure::config::DEFAULT_PAGE_SIZE;
use crate::infrastructure::{ContentStore, MarkerQuery, QueryCache};
use chrono::NaiveDateTime;

/// Totals for a finished scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Identifiers emitted
    pub total: usize,
    /// Non-empty pages fetched
    pub pages: usize,
}

impl ScanSummary {
    pub fn message(&self) -> String {
        let noun = if self.total == 1 { "post" } else { "posts" };
        format!("Finished! Found a total of {} {}.", self.total, noun)
    }
}

/// Progress reported while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Dates validated, about to query
    Started(DateWindow),
    Found(ContentId),
    Finished(ScanSummary),
}

/// Lazily fetched pages of marker-tagged ids.
///
/// Ends at the first empty page, or after yielding a read error.
pub struct ScanPages<'a, S: ContentStore + ?Sized> {
    store: &'a S,
    query: MarkerQuery,
    cache: QueryCache,
    done: bool,
}

impl<S: ContentStore + ?Sized> ScanPages<'_, S> {
    /// Index of the page the next call to `next` will request
    pub fn next_page(&self) -> usize {
        self.query.page
    }
}

impl<S: ContentStore + ?Sized> Iterator for ScanPages<'_, S> {
    type Item = Result<Vec<ContentId>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let fetched = self.store.query_by_marker(&self.query, &mut self.cache);
        self.store.clear_transient_query_cache(&mut self.cache);

        match fetched {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(ids) if ids.is_empty() => {
                self.done = true;
                None
            }
            Ok(ids) => {
                self.query.page += 1;
                Some(Ok(ids))
            }
        }
    }
}

/// Read-only batch driver over a content store
pub struct BulkScanner<'a, S: ContentStore + ?Sized> {
    store: &'a S,
    marker: MarkerTerm,
    page_size: usize,
    window_days: i64,
}

impl<'a, S: ContentStore + ?Sized> BulkScanner<'a, S> {
    pub fn new(store: &'a S) -> Self {
        BulkScanner {
            store,
            marker: MarkerTerm::READ_MORE,
            page_size: DEFAULT_PAGE_SIZE,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Pages of ids for an already validated window
    pub fn pages(&self, window: DateWindow) -> ScanPages<'a, S> {
        ScanPages {
            store: self.store,
            query: MarkerQuery {
                marker: self.marker,
                window,
                kinds: ContentKind::ALL.to_vec(),
                page: 1,
                page_size: self.page_size,
            },
            cache: QueryCache::new(),
            done: false,
        }
    }

    /// Validate the request, then stream every matching id to `sink`.
    ///
    /// Invalid dates fail before any query is issued. A failed page read ends
    /// the scan with an error after earlier pages were already emitted.
    pub fn scan<F>(&self, request: &ScanRequest, now: NaiveDateTime, mut sink: F) -> Result<ScanSummary>
    where
        F: FnMut(ScanEvent) -> Result<()>,
    {
        let window = request.resolve(now, self.window_days)?;
        sink(ScanEvent::Started(window))?;

        let mut summary = ScanSummary::default();
        let mut pages = self.pages(window);
        for page in pages.by_ref() {
            let ids = page?;
            summary.pages += 1;
            tracing::debug!(page = summary.pages, count = ids.len(), "page fetched");

            for id in ids {
                sink(ScanEvent::Found(id))?;
                summary.total += 1;
            }
        }

        tracing::info!(
            total = summary.total,
            pages = summary.pages,
            last_page = pages.next_page(),
            "scan finished"
        );
        sink(ScanEvent::Finished(summary))?;
        Ok(summary)
    }
}
