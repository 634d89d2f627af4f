//! Content items and their identifiers

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub u64);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(format!(
                "Invalid content id: '{}'. Ids are positive integers",
                s
            )),
            Ok(id) => Ok(ContentId(id)),
        }
    }
}

/// Kind of content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Dated article, permalinked under its publication month
    #[default]
    Post,
    /// Standalone page, permalinked at the site root
    Page,
}

impl ContentKind {
    /// Every kind a marker scan covers
    pub const ALL: [ContentKind; 2] = [ContentKind::Post, ContentKind::Page];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Page => "page",
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" => Ok(ContentKind::Post),
            "page" => Ok(ContentKind::Page),
            _ => Err(format!(
                "Invalid kind: '{}'. Valid kinds are: post, page",
                s
            )),
        }
    }
}

/// An addressable unit of published material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    #[serde(default)]
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    pub published: NaiveDateTime,
    #[serde(default)]
    pub body: String,
}

impl ContentItem {
    /// Create an item with a slug derived from its title
    pub fn new(
        id: ContentId,
        kind: ContentKind,
        title: impl Into<String>,
        published: NaiveDateTime,
        body: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let slug = slugify(&title, id);
        ContentItem {
            id,
            kind,
            title,
            slug,
            published,
            body: body.into(),
        }
    }

    /// Permalink of this item below `site_url`
    pub fn permalink(&self, site_url: &str) -> String {
        let base = site_url.trim_end_matches('/');
        match self.kind {
            ContentKind::Page => format!("{}/{}/", base, self.slug),
            ContentKind::Post => format!(
                "{}/{}/{}/",
                base,
                self.published.format("%Y/%m"),
                self.slug
            ),
        }
    }
}

/// Lowercase, dash-separated slug; falls back to the id for titles with no usable characters
pub fn slugify(title: &str, id: ContentId) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();

    if slug.is_empty() {
        id.to_string()
    } else {
        slug
    }
}

/// Parse a publication timestamp given as `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS`
pub fn parse_published(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
