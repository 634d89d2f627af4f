//! Keep the read-more marker in line with item bodies

use crate::domain::{has_block, ContentItem, MarkerChange, MarkerTerm, READ_MORE_BLOCK};
use crate::error::Result;
use crate::infrastructure::ContentStore;

/// Attaches or detaches a marker term depending on whether a block is present
#[derive(Debug, Clone, Copy)]
pub struct MarkerSyncer {
    block_name: &'static str,
    marker: MarkerTerm,
}

impl Default for MarkerSyncer {
    fn default() -> Self {
        MarkerSyncer {
            block_name: READ_MORE_BLOCK,
            marker: MarkerTerm::READ_MORE,
        }
    }
}

impl MarkerSyncer {
    pub fn new(block_name: &'static str, marker: MarkerTerm) -> Self {
        MarkerSyncer { block_name, marker }
    }

    /// Synchronize the marker for one saved item.
    ///
    /// A body that fails to parse counts as not containing the block, so the
    /// marker is removed. Store write errors are returned unchanged.
    pub fn sync<S: ContentStore + ?Sized>(&self, store: &S, item: &ContentItem) -> Result<MarkerChange> {
        if has_block(&item.body, self.block_name) {
            store.attach_marker(item, self.marker)?;
            tracing::debug!(id = %item.id, marker = %self.marker, "marker attached");
            Ok(MarkerChange::Attached)
        } else {
            store.detach_marker(item.id, self.marker)?;
            tracing::debug!(id = %item.id, marker = %self.marker, "marker detached");
            Ok(MarkerChange::Detached)
        }
    }
}
