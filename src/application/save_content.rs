//! Save content use case
//!
//! Saving writes the item through the store and then synchronizes its marker
//! before returning, so a stored body and its marker never disagree once a
//! save has reported success.

use crate::application::sync_marker::MarkerSyncer;
use crate::domain::content::slugify;
use crate::domain::{ContentId, ContentItem, ContentKind, MarkerChange};
use crate::error::{BlockmarkError, Result};
use crate::infrastructure::ContentStore;
use chrono::NaiveDateTime;

/// Field updates for a save; unset fields keep their stored values
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub id: Option<ContentId>,
    pub title: Option<String>,
    pub kind: Option<ContentKind>,
    pub slug: Option<String>,
    pub published: Option<NaiveDateTime>,
    pub body: Option<String>,
}

impl ItemDraft {
    /// Merge the draft over an existing item, or build a new one.
    ///
    /// New items need a title; publication defaults to `now`.
    pub fn apply(self, existing: Option<ContentItem>, now: NaiveDateTime) -> Result<ContentItem> {
        let id = self
            .id
            .or(existing.as_ref().map(|item| item.id))
            .ok_or_else(|| BlockmarkError::InvalidInput("An item id is required".to_string()))?;

        match existing {
            Some(mut item) => {
                if let Some(title) = self.title {
                    item.title = title;
                }
                if let Some(kind) = self.kind {
                    item.kind = kind;
                }
                if let Some(slug) = self.slug {
                    item.slug = slugify(&slug, id);
                }
                if let Some(published) = self.published {
                    item.published = published;
                }
                if let Some(body) = self.body {
                    item.body = body;
                }
                Ok(item)
            }
            None => {
                let title = self.title.ok_or_else(|| {
                    BlockmarkError::InvalidInput(format!("Item {} is new and needs a --title", id))
                })?;
                let mut item = ContentItem::new(
                    id,
                    self.kind.unwrap_or_default(),
                    title,
                    self.published.unwrap_or(now),
                    self.body.unwrap_or_default(),
                );
                if let Some(slug) = self.slug {
                    item.slug = slugify(&slug, id);
                }
                Ok(item)
            }
        }
    }
}

/// Counts from a full marker resynchronization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResyncSummary {
    pub attached: usize,
    pub detached: usize,
}

impl ResyncSummary {
    pub fn total(&self) -> usize {
        self.attached + self.detached
    }
}

/// Service for saving content items
pub struct SaveContentService<S: ContentStore> {
    store: S,
    syncer: MarkerSyncer,
}

impl<S: ContentStore> SaveContentService<S> {
    /// Create a new save service
    pub fn new(store: S) -> Self {
        SaveContentService {
            store,
            syncer: MarkerSyncer::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store the item, then update its marker
    pub fn save(&self, item: &ContentItem) -> Result<MarkerChange> {
        self.store.put_item(item)?;
        let change = self.syncer.sync(&self.store, item)?;
        tracing::info!(
            id = %item.id,
            kind = item.kind.as_str(),
            marker = change.as_str(),
            "content saved"
        );
        Ok(change)
    }

    /// Merge a draft over the stored item (if any) and save the result
    pub fn save_draft(&self, draft: ItemDraft, now: NaiveDateTime) -> Result<(ContentItem, MarkerChange)> {
        let existing = match draft.id {
            Some(id) => match self.store.get_item(id) {
                Ok(item) => Some(item),
                Err(BlockmarkError::ContentNotFound(_)) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        let item = draft.apply(existing, now)?;
        let change = self.save(&item)?;
        Ok((item, change))
    }

    /// Re-run marker synchronization for every stored item
    pub fn resync(&self) -> Result<ResyncSummary> {
        let mut summary = ResyncSummary::default();

        for id in self.store.list_item_ids()? {
            let item = self.store.get_item(id)?;
            match self.syncer.sync(&self.store, &item)? {
                MarkerChange::Attached => summary.attached += 1,
                MarkerChange::Detached => summary.detached += 1,
            }
        }

        tracing::info!(
            attached = summary.attached,
            detached = summary.detached,
            "markers resynchronized"
        );
        Ok(summary)
    }
}
