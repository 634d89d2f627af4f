//! blockmark - read-more-link block tracking
//!
//! Keeps a private marker term in sync with content bodies that embed the
//! read-more-link block, and scans the marked set page by page.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

pub use error::BlockmarkError;
