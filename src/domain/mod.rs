//! Domain layer - Content model, block detection and scan windows

pub mod blocks;
pub mod content;
pub mod date_window;
pub mod marker;

pub use blocks::{has_block, parse_blocks, Block, BlockParseError, READ_MORE_BLOCK};
pub use content::{ContentId, ContentItem, ContentKind};
pub use date_window::{DateWindow, ScanRequest, DEFAULT_WINDOW_DAYS};
pub use marker::{MarkerChange, MarkerTerm};
