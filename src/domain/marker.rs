//! Marker terms: private tags derived from content bodies

use std::fmt;

/// A tag in a private classification namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerTerm {
    pub taxonomy: &'static str,
    pub slug: &'static str,
}

impl MarkerTerm {
    /// Marks items whose body embeds the read-more-link widget
    pub const READ_MORE: MarkerTerm = MarkerTerm {
        taxonomy: "blockmark_block_marker",
        slug: "has-read-more-block",
    };
}

impl fmt::Display for MarkerTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.taxonomy, self.slug)
    }
}

/// Outcome of synchronizing a marker with an item body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerChange {
    Attached,
    Detached,
}

impl MarkerChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerChange::Attached => "attached",
            MarkerChange::Detached => "detached",
        }
    }
}
