//! Serialized block parsing
//!
//! Content bodies embed structured blocks as HTML comment delimiters:
//!
//! ```text
//! <!-- wp:namespace/name {"attr":1} -->inner html<!-- /wp:namespace/name -->
//! <!-- wp:namespace/name {"attr":1} /-->
//! ```
//!
//! Names without a namespace belong to `core/`. Attributes are an optional JSON object.

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

/// Serialized name of the read-more-link widget
pub const READ_MORE_BLOCK: &str = "dmg-rml/read-more-link";

const DEFAULT_NAMESPACE: &str = "core";

/// Regex for a single block delimiter (opener, closer or void)
fn delimiter_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?s)<!--\s+(?P<closer>/)?wp:(?P<namespace>[a-z][a-z0-9_-]*/)?(?P<name>[a-z][a-z0-9_-]*)\s+(?:(?P<attrs>\{.*?\})\s+)?(?P<void>/)?-->",
        )
        .unwrap()
    })
}

/// A parsed block and its nested blocks
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Fully qualified name (`namespace/name`)
    pub name: String,
    pub attrs: Map<String, Value>,
    pub inner: Vec<Block>,
}

impl Block {
    /// True if this block or any nested block has the given name
    pub fn contains(&self, name: &str) -> bool {
        self.name == name || self.inner.iter().any(|b| b.contains(name))
    }
}

/// Why a body could not be parsed into blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockParseError {
    /// A closer appeared with no open block
    UnexpectedCloser(String),
    /// A closer did not match the innermost open block
    MismatchedCloser { expected: String, found: String },
    /// Input ended while blocks were still open
    Unclosed(String),
    /// Attributes were present but not a JSON object
    InvalidAttributes(String),
}

impl fmt::Display for BlockParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockParseError::UnexpectedCloser(name) => {
                write!(f, "closer for '{}' without an open block", name)
            }
            BlockParseError::MismatchedCloser { expected, found } => {
                write!(f, "expected closer for '{}', found '{}'", expected, found)
            }
            BlockParseError::Unclosed(name) => write!(f, "block '{}' is never closed", name),
            BlockParseError::InvalidAttributes(name) => {
                write!(f, "block '{}' has malformed attributes", name)
            }
        }
    }
}

impl std::error::Error for BlockParseError {}

/// Normalize a block name, adding the default namespace when missing
pub fn normalize_name(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("{}/{}", DEFAULT_NAMESPACE, name)
    }
}

fn qualified_name(caps: &Captures) -> String {
    let name = &caps["name"];
    match caps.name("namespace") {
        Some(ns) => format!("{}{}", ns.as_str(), name),
        None => format!("{}/{}", DEFAULT_NAMESPACE, name),
    }
}

fn parse_attrs(caps: &Captures, name: &str) -> Result<Map<String, Value>, BlockParseError> {
    match caps.name("attrs") {
        None => Ok(Map::new()),
        Some(raw) => match serde_json::from_str::<Value>(raw.as_str()) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(BlockParseError::InvalidAttributes(name.to_string())),
        },
    }
}

/// Parse every block in `body` into a tree
pub fn parse_blocks(body: &str) -> Result<Vec<Block>, BlockParseError> {
    let mut roots: Vec<Block> = Vec::new();
    let mut open: Vec<Block> = Vec::new();

    for caps in delimiter_regex().captures_iter(body) {
        let name = qualified_name(&caps);

        if caps.name("closer").is_some() {
            let block = match open.pop() {
                Some(block) => block,
                None => return Err(BlockParseError::UnexpectedCloser(name)),
            };
            if block.name != name {
                return Err(BlockParseError::MismatchedCloser {
                    expected: block.name,
                    found: name,
                });
            }
            push_block(&mut roots, &mut open, block);
            continue;
        }

        let block = Block {
            attrs: parse_attrs(&caps, &name)?,
            name,
            inner: Vec::new(),
        };

        if caps.name("void").is_some() {
            push_block(&mut roots, &mut open, block);
        } else {
            open.push(block);
        }
    }

    if let Some(block) = open.pop() {
        return Err(BlockParseError::Unclosed(block.name));
    }

    Ok(roots)
}

fn push_block(roots: &mut Vec<Block>, open: &mut [Block], block: Block) {
    match open.last_mut() {
        Some(parent) => parent.inner.push(block),
        None => roots.push(block),
    }
}

/// True if `body` parses and contains a block named exactly `name` at any depth.
///
/// A body that does not parse is reported as not containing the block.
pub fn has_block(body: &str, name: &str) -> bool {
    let name = normalize_name(name);
    match parse_blocks(body) {
        Ok(blocks) => blocks.iter().any(|b| b.contains(&name)),
        Err(e) => {
            tracing::debug!(error = %e, "body does not parse as blocks");
            false
        }
    }
}
