use serde::{Deserialize, Serialize};

/// Identity of the principal that created a file.
///
/// Set once at creation and carried unchanged through every revision of the
/// file's chain. The engine treats it as opaque; authentication and signing
/// belong to the substrate layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorId(String);

impl AuthorId {
    /// Create a new author identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AuthorId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for AuthorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
