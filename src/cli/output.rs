//! Output formatting utilities

use crate::application::{ResyncSummary, ScanEvent};
use crate::domain::{ContentItem, MarkerChange};
use crate::infrastructure::Config;

/// Line printed for a scan event
pub fn format_scan_event(event: &ScanEvent) -> String {
    match event {
        ScanEvent::Started(window) => window.describe(),
        ScanEvent::Found(id) => id.to_string(),
        ScanEvent::Finished(summary) => summary.message(),
    }
}

pub fn format_saved(item: &ContentItem, change: MarkerChange) -> String {
    format!("Saved {} (marker {})", item.id, change.as_str())
}

pub fn format_resync(summary: &ResyncSummary) -> String {
    let noun = if summary.total() == 1 { "item" } else { "items" };
    format!(
        "Resynced {} {} ({} attached, {} detached)",
        summary.total(),
        noun,
        summary.attached,
        summary.detached
    )
}

pub fn format_config(config: &Config) -> String {
    format!(
        "page_size = {}\nsite_url = {}\ncreated = {}",
        config.page_size,
        config.site_url,
        config.created.to_rfc3339()
    )
}
