//! CLI command definitions

use crate::domain::{ContentId, ContentKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blockmark")]
#[command(about = "Track and list content that embeds the read-more-link block", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new content store
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Base URL used to build permalinks
        #[arg(long)]
        site_url: Option<String>,
    },

    /// Create or update a content item and synchronize its marker
    Save {
        /// Item id
        id: ContentId,

        /// Title (required for new items)
        #[arg(short, long)]
        title: Option<String>,

        /// Item kind (post, page)
        #[arg(short, long)]
        kind: Option<ContentKind>,

        /// Publication time (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
        #[arg(short, long)]
        published: Option<String>,

        /// URL slug (derived from the title by default)
        #[arg(long)]
        slug: Option<String>,

        /// Body text
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,
    },

    /// Show the title and permalink of an item
    Show {
        /// Item id
        id: ContentId,
    },

    /// Re-synchronize the marker for every stored item
    Resync,

    /// List ids of items containing the read-more-link block
    ScanMarkedContent {
        /// Only items published on or before this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date_before: Option<String>,

        /// Only items published on or after this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date_after: Option<String>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}
