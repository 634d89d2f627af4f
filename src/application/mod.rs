//! Application layer - Use cases and orchestration

pub mod init;
pub mod manage_config;
pub mod save_content;
pub mod scan;
pub mod sync_marker;

pub use manage_config::ConfigService;
pub use save_content::{ItemDraft, ResyncSummary, SaveContentService};
pub use scan::{BulkScanner, ScanEvent, ScanPages, ScanSummary};
pub use sync_marker::MarkerSyncer;
