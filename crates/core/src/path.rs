use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur when normalizing a raw path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A path segment contains a character outside the allowed set.
    #[error("path contains forbidden character {ch:?}: {path}")]
    ForbiddenCharacter {
        /// The offending character.
        ch: char,
        /// The raw path as supplied by the caller.
        path: String,
    },
}

/// A normalized absolute directory path.
///
/// Normalization is bit-exact: `\` becomes `/`, consecutive separators
/// collapse to one, the trailing separator is stripped (bare `/` stays), and
/// any character outside `[A-Za-z0-9_./\- ]` is rejected. The result always
/// starts with `/` and never ends with one except for the root itself.
///
/// Hierarchy is segment-wise: `/sub` is the parent of `/sub/folder` but has
/// no relation to `/subfolder2`, even though it is a string prefix of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirPath(String);

impl DirPath {
    /// The root directory `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// Normalize and validate a raw path.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let unified = raw.replace('\\', "/");
        let mut segments = Vec::new();
        for segment in unified.split('/').filter(|s| !s.is_empty()) {
            if let Some(ch) = segment.chars().find(|c| !Self::is_allowed_char(*c)) {
                return Err(PathError::ForbiddenCharacter {
                    ch,
                    path: raw.to_owned(),
                });
            }
            segments.push(segment);
        }
        if segments.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(format!("/{}", segments.join("/"))))
    }

    /// Whether `c` may appear inside a path segment or file name.
    #[must_use]
    pub fn is_allowed_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ' ')
    }

    /// The normalized path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root directory.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path segments, root first. Empty for the root itself.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Every prefix of this path, from the root down to the path itself.
    ///
    /// `/a/b` yields `/`, `/a`, `/a/b`. The root yields only itself.
    #[must_use]
    pub fn prefixes(&self) -> Vec<DirPath> {
        let mut prefixes = vec![Self::root()];
        let mut current = String::new();
        for segment in self.segments() {
            current.push('/');
            current.push_str(segment);
            prefixes.push(Self(current.clone()));
        }
        prefixes
    }

    /// The containing directory, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<DirPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_owned())),
            None => None,
        }
    }
}

impl fmt::Display for DirPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DirPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DirPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
