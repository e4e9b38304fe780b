//! Key paths used to locate font resources inside page dictionaries.
//!
//! A [`FontPath`] is a sequence of [`KeyPattern`]s, one per dictionary level.
//! The default path `Resources/Font/*` accepts every key of a page's font
//! resource dictionary.

use std::fmt;
use std::str::FromStr;

/// Pattern matched against one dictionary key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyPattern {
    /// The key must equal this name.
    Exact(String),
    /// The key must start with `prefix` and end with `suffix`
    /// (written `prefix*suffix`).
    Wildcard {
        /// Text before the `*`.
        prefix: String,
        /// Text after the `*`.
        suffix: String,
    },
}

impl KeyPattern {
    /// Parse a single path segment. The first `*` is the wildcard; a leading
    /// `/` is ignored.
    pub fn parse(segment: &str) -> Self {
        let segment = segment.strip_prefix('/').unwrap_or(segment);
        match segment.split_once('*') {
            Some((prefix, suffix)) => KeyPattern::Wildcard {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            },
            None => KeyPattern::Exact(segment.to_string()),
        }
    }

    /// Returns true if `key` (with or without a leading `/`) matches.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.strip_prefix('/').unwrap_or(key);
        match self {
            KeyPattern::Exact(name) => key == name,
            KeyPattern::Wildcard { prefix, suffix } => {
                key.len() >= prefix.len() + suffix.len()
                    && key.starts_with(prefix.as_str())
                    && key.ends_with(suffix.as_str())
            }
        }
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::Exact(name) => f.write_str(name),
            KeyPattern::Wildcard { prefix, suffix } => write!(f, "{prefix}*{suffix}"),
        }
    }
}

/// A parsed key path, e.g. `Resources/Font/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontPath {
    segments: Vec<KeyPattern>,
}

impl FontPath {
    /// Build a path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(|s| KeyPattern::parse(s.as_ref()))
                .collect(),
        }
    }

    /// The patterns, outermost first.
    pub fn segments(&self) -> &[KeyPattern] {
        &self.segments
    }

    /// Number of dictionary levels in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Default for FontPath {
    fn default() -> Self {
        FontPath::new(["Resources", "Font", "*"])
    }
}

impl FromStr for FontPath {
    type Err = std::convert::Infallible;

    /// Parse a `/`-separated path. Empty segments are ignored, so
    /// `/Resources/Font/F*` and `Resources/Font/F*` are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FontPath::new(s.split('/').filter(|seg| !seg.is_empty())))
    }
}

impl fmt::Display for FontPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}
