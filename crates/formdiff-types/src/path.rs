//! Typed change-record paths.
//!
//! A [`Path`] is the ordered list of keys and positions leading from the
//! document root to a changed value. Paths render in bracket notation rooted
//! at `root`, e.g. `root['fields'][0]['rules'][1]['min']`, which is also the
//! raw form handed to clients when a change cannot be classified.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The literal anchor every rendered path starts with.
pub const ROOT: &str = "root";

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array position.
    Index(usize),
}

impl PathSegment {
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// The key name, if this segment is an object key.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }

    /// Returns `true` if this segment is the object key `name`.
    pub fn is_key(&self, name: &str) -> bool {
        self.as_key() == Some(name)
    }

    /// A position encoded either as an array index or as an all-digit key.
    pub fn as_position(&self) -> Option<String> {
        match self {
            Self::Index(i) => Some(i.to_string()),
            Self::Key(k) if !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()) => {
                Some(k.clone())
            }
            Self::Key(_) => None,
        }
    }
}

/// Keys render quoted, with `\` and `'` backslash-escaped.
impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "['{}']", k.replace('\\', "\\\\").replace('\'', "\\'")),
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a value inside a document, from the root down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path extended by one segment.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Best-effort segment list for client rendering. See [`tokenize_path`].
    pub fn tokens(&self) -> Vec<String> {
        tokenize_path(&self.to_string())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT)?;
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Returns `true` if `name` is a non-empty run of `[A-Za-z0-9_-]`.
pub fn is_name_token(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_token_char)
}

/// Split a rendered path on every run of characters outside `[A-Za-z0-9_-]`
/// and discard the first and last pieces (the `root` anchor and the empty
/// remainder after the closing bracket).
///
/// ```
/// use formdiff_types::tokenize_path;
///
/// assert_eq!(
///     tokenize_path("root['fields'][0]['options'][2]"),
///     vec!["fields", "0", "options", "2"],
/// );
/// assert!(tokenize_path("root").is_empty());
/// ```
pub fn tokenize_path(raw: &str) -> Vec<String> {
    let pieces: Vec<&str> = raw.split(|c: char| !is_token_char(c)).collect();
    let last = pieces.len().saturating_sub(1);

    // Separator runs collapse: only the outermost pieces may be empty.
    let pieces: Vec<&str> = pieces
        .into_iter()
        .enumerate()
        .filter(|(i, p)| *i == 0 || *i == last || !p.is_empty())
        .map(|(_, p)| p)
        .collect();

    if pieces.len() < 2 {
        return Vec::new();
    }
    pieces[1..pieces.len() - 1]
        .iter()
        .map(|p| p.to_string())
        .collect()
}
