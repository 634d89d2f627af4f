//! Content store abstraction and its file system implementation

use crate::domain::{ContentId, ContentItem, ContentKind, DateWindow, MarkerTerm};
use crate::error::{BlockmarkError, Result};
use crate::infrastructure::config::STORE_DIR;
use crate::infrastructure::query_cache::{ItemHeader, QueryCache};
use crate::infrastructure::Config;
use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use walkdir::WalkDir;

const INDEX_STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One page of a marker lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerQuery {
    pub marker: MarkerTerm,
    pub window: DateWindow,
    pub kinds: Vec<ContentKind>,
    /// 1-based page index
    pub page: usize,
    pub page_size: usize,
}

impl MarkerQuery {
    pub fn describe(&self) -> String {
        format!(
            "marker={} page={} page_size={}",
            self.marker, self.page, self.page_size
        )
    }
}

/// Storage for content items and their marker associations
pub trait ContentStore {
    /// Load a single item
    fn get_item(&self, id: ContentId) -> Result<ContentItem>;

    /// Create or replace an item
    fn put_item(&self, item: &ContentItem) -> Result<()>;

    /// Ids of every stored item, ascending
    fn list_item_ids(&self) -> Result<Vec<ContentId>>;

    /// Permalink and title of an item
    fn get_permalink_and_title(&self, id: ContentId) -> Result<(String, String)>;

    /// Ids of marker-tagged items in the query window, one page at a time.
    ///
    /// Ordered newest publication first, ties broken by id descending.
    fn query_by_marker(&self, query: &MarkerQuery, cache: &mut QueryCache)
        -> Result<Vec<ContentId>>;

    /// Associate `marker` with the item; a no-op if already associated
    fn attach_marker(&self, item: &ContentItem, marker: MarkerTerm) -> Result<()>;

    /// Remove the association; a no-op if not associated
    fn detach_marker(&self, id: ContentId, marker: MarkerTerm) -> Result<()>;

    /// Every item currently associated with `marker`
    fn marker_members(&self, marker: MarkerTerm) -> Result<BTreeSet<ContentId>>;

    /// Drop transient query state; never touches durable data
    fn clear_transient_query_cache(&self, cache: &mut QueryCache) {
        cache.clear();
    }
}

/// Filter candidate headers to the query and cut out the requested page
pub(crate) fn select_page(
    query: &MarkerQuery,
    candidates: impl IntoIterator<Item = (ContentId, ItemHeader)>,
) -> Vec<ContentId> {
    let mut matches: Vec<(ContentId, NaiveDateTime)> = candidates
        .into_iter()
        .filter(|(_, h)| query.kinds.contains(&h.kind) && query.window.contains(h.published))
        .map(|(id, h)| (id, h.published))
        .collect();

    // Newest first
    matches.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let offset = query.page.saturating_sub(1).saturating_mul(query.page_size);
    matches
        .into_iter()
        .skip(offset)
        .take(query.page_size)
        .map(|(id, _)| id)
        .collect()
}

/// One marker association on disk: `terms/<taxonomy>/<slug>/<id>/<kind>-<stamp>`.
///
/// The entry name carries the fields a marker query filters and sorts on, so a
/// page can be chosen from directory listings alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexEntry {
    id: ContentId,
    header: ItemHeader,
}

impl IndexEntry {
    fn for_item(item: &ContentItem) -> Self {
        IndexEntry {
            id: item.id,
            header: ItemHeader {
                kind: item.kind,
                published: item.published,
            },
        }
    }

    fn file_name(&self) -> String {
        format!(
            "{}-{}",
            self.header.kind.as_str(),
            self.header.published.format(INDEX_STAMP_FORMAT)
        )
    }

    fn parse(id_dir: &str, file_name: &str) -> Option<Self> {
        let id = id_dir.parse::<ContentId>().ok()?;
        let (kind, stamp) = file_name.split_once('-')?;
        Some(IndexEntry {
            id,
            header: ItemHeader {
                kind: kind.parse::<ContentKind>().ok()?,
                published: NaiveDateTime::parse_from_str(stamp, INDEX_STAMP_FORMAT).ok()?,
            },
        })
    }
}

/// File system implementation of ContentStore
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    pub root: PathBuf,
}

impl FileSystemStore {
    /// Create a new store with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemStore { root }
    }

    /// Discover the store root by walking up from the current directory.
    /// First checks BLOCKMARK_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("BLOCKMARK_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_store_dir(&path) {
                return Ok(FileSystemStore::new(path));
            } else {
                return Err(BlockmarkError::Config(format!(
                    "BLOCKMARK_ROOT is set to '{}' but no .blockmark directory found. \
                    Run 'blockmark init' in that directory or unset BLOCKMARK_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover the store root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_store_dir(&current) {
                return Ok(FileSystemStore::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(BlockmarkError::NotBlockmarkDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_store_dir(path: &Path) -> bool {
        path.join(STORE_DIR).is_dir()
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_store_dir(&self.root)
    }

    /// Create the .blockmark directory structure
    pub fn initialize(&self) -> Result<()> {
        let store_dir = self.root.join(STORE_DIR);

        if store_dir.exists() {
            return Err(BlockmarkError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&store_dir)?;
        fs::create_dir(self.items_dir())?;
        fs::create_dir(store_dir.join("terms"))?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn items_dir(&self) -> PathBuf {
        self.root.join(STORE_DIR).join("items")
    }

    fn item_path(&self, id: ContentId) -> PathBuf {
        self.items_dir().join(format!("{}.toml", id))
    }

    fn term_dir(&self, marker: MarkerTerm) -> PathBuf {
        self.root
            .join(STORE_DIR)
            .join("terms")
            .join(marker.taxonomy)
            .join(marker.slug)
    }

    fn association_dir(&self, id: ContentId, marker: MarkerTerm) -> PathBuf {
        self.term_dir(marker).join(id.to_string())
    }

    /// Every association entry for `marker`, skipping names that do not parse
    fn read_index(&self, marker: MarkerTerm) -> Result<Vec<IndexEntry>> {
        let dir = self.term_dir(marker);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(2).max_depth(2) {
            let entry = match entry {
                Ok(entry) => entry,
                // Removed by a concurrent detach while listing
                Err(e) if e.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound) => {
                    continue
                }
                Err(e) => return Err(BlockmarkError::Store(e.to_string())),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let id_dir = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str());
            let parsed = match (id_dir, entry.file_name().to_str()) {
                (Some(id), Some(name)) => IndexEntry::parse(id, name),
                _ => None,
            };
            match parsed {
                Some(parsed) => entries.push(parsed),
                None => {
                    tracing::debug!(path = %entry.path().display(), "skipping unrecognized index entry")
                }
            }
        }
        Ok(entries)
    }

    /// Write to a temp file in the same directory, then rename into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so the destination is removed first.
    fn write_atomic(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_name = format!(
            "{}.blockmark-tmp-{}-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("entry.toml"),
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;

        let replaced = if cfg!(windows) && path.exists() {
            fs::remove_file(path).and_then(|_| fs::rename(&tmp_path, path))
        } else {
            fs::rename(&tmp_path, path)
        };

        if let Err(e) = replaced {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl ContentStore for FileSystemStore {
    fn get_item(&self, id: ContentId) -> Result<ContentItem> {
        let path = self.item_path(id);
        let contents = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlockmarkError::ContentNotFound(id)
            } else {
                BlockmarkError::Io(e)
            }
        })?;

        let item: ContentItem = toml::from_str(&contents).map_err(|e| {
            BlockmarkError::Store(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if item.id != id {
            return Err(BlockmarkError::Store(format!(
                "{} holds item {}, expected {}",
                path.display(),
                item.id,
                id
            )));
        }
        Ok(item)
    }

    fn put_item(&self, item: &ContentItem) -> Result<()> {
        let contents = toml::to_string_pretty(item)?;
        Self::write_atomic(&self.item_path(item.id), &contents)
    }

    fn list_item_ids(&self) -> Result<Vec<ContentId>> {
        let dir = self.items_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| BlockmarkError::Store(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(stem) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(".toml"))
            else {
                continue;
            };
            if let Ok(id) = stem.parse::<ContentId>() {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn get_permalink_and_title(&self, id: ContentId) -> Result<(String, String)> {
        let config = self.load_config()?;
        let item = self.get_item(id)?;
        Ok((item.permalink(&config.site_url), item.title))
    }

    fn query_by_marker(
        &self,
        query: &MarkerQuery,
        cache: &mut QueryCache,
    ) -> Result<Vec<ContentId>> {
        cache.record_query(query.describe());

        let entries: Vec<IndexEntry> = self
            .read_index(query.marker)?
            .into_iter()
            .filter(|e| {
                let present = self.item_path(e.id).is_file();
                if !present {
                    tracing::warn!(id = %e.id, "marker references a missing item");
                }
                present
            })
            .collect();

        let page = select_page(query, entries.iter().map(|e| (e.id, e.header)));
        let selected: HashSet<ContentId> = page.iter().copied().collect();
        for entry in entries.iter().filter(|e| selected.contains(&e.id)) {
            cache.insert_header(entry.id, entry.header);
        }
        Ok(page)
    }

    fn attach_marker(&self, item: &ContentItem, marker: MarkerTerm) -> Result<()> {
        let dir = self.association_dir(item.id, marker);
        fs::create_dir_all(&dir)?;

        let wanted = IndexEntry::for_item(item).file_name();
        let mut present = false;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_name().to_str() == Some(wanted.as_str()) {
                present = true;
            } else {
                // Stale kind or publication date from an earlier save
                remove_if_present(&entry.path())?;
            }
        }

        if !present {
            fs::File::create(dir.join(&wanted))?;
        }
        Ok(())
    }

    fn detach_marker(&self, id: ContentId, marker: MarkerTerm) -> Result<()> {
        match fs::remove_dir_all(self.association_dir(id, marker)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn marker_members(&self, marker: MarkerTerm) -> Result<BTreeSet<ContentId>> {
        Ok(self.read_index(marker)?.into_iter().map(|e| e.id).collect())
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
